//! Summary caching: value-keyed memoization with TTL, invalidated by
//! explicit contract update events.

mod error;
pub use error::CacheError;

pub mod events;
pub use events::{ContractEvent, EventBus, run_invalidation};

mod summary_cache;
pub use summary_cache::{CacheStats, SummaryCache};
