//! Contract financial engine: lenient numeric coercion, inclusive-fee
//! extraction, and the total/bank/owner summary with variation orders.

pub mod coerce;
mod error;
pub mod fee;
pub mod model;
pub mod report;
pub mod summary;
pub mod vat;

pub use error::SummaryError;
pub use fee::{FeeSplit, fee_inclusive};
pub use model::{Classification, Contract, ExtraMode, Variation};
pub use report::{BreakdownTable, Check, Discrepancy, breakdown_tables, cross_check, vat_table};
pub use summary::{ContractSummary, ShareBreakdown, summarize, summarize_value};
