//! Contract update notifications.
//!
//! Whatever edits a contract, its site-plan owners or its variations
//! publishes a [`ContractEvent`] on the [`EventBus`]. Subscribers (the
//! summary cache among them) react to the message instead of re-fetching
//! on their own schedule.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use crate::SummaryCache;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContractEvent {
    ContractUpdated {
        project_id: u64,
        at: DateTime<Utc>,
    },
    SiteplanOwnersUpdated {
        project_id: u64,
        at: DateTime<Utc>,
    },
    VariationsChanged {
        project_id: u64,
        at: DateTime<Utc>,
    },
}

impl ContractEvent {
    pub fn contract_updated(project_id: u64) -> Self {
        Self::ContractUpdated {
            project_id,
            at: Utc::now(),
        }
    }

    pub fn siteplan_owners_updated(project_id: u64) -> Self {
        Self::SiteplanOwnersUpdated {
            project_id,
            at: Utc::now(),
        }
    }

    pub fn variations_changed(project_id: u64) -> Self {
        Self::VariationsChanged {
            project_id,
            at: Utc::now(),
        }
    }

    pub fn project_id(&self) -> u64 {
        match self {
            Self::ContractUpdated { project_id, .. }
            | Self::SiteplanOwnersUpdated { project_id, .. }
            | Self::VariationsChanged { project_id, .. } => *project_id,
        }
    }
}

/// Broadcast channel for [`ContractEvent`]s.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ContractEvent>,
}

impl EventBus {
    /// `capacity` is how many events a slow subscriber may fall behind
    /// before it starts losing them.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish `event`. Returns the number of subscribers that will see it.
    pub fn publish(&self, event: ContractEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ContractEvent> {
        self.tx.subscribe()
    }
}

/// Apply events to `cache` until every publisher is gone.
///
/// A subscriber that fell behind cannot know which projects it missed, so
/// it clears the whole cache.
pub async fn run_invalidation(
    cache: Arc<Mutex<SummaryCache>>,
    mut rx: broadcast::Receiver<ContractEvent>,
) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                let removed = cache.lock().await.apply(&event);
                info!(project_id = event.project_id(), removed, "invalidated cached summaries");
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "event subscriber lagged, clearing summary cache");
                cache.lock().await.clear();
            }
            Err(RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitework_core::{Classification, Contract};
    use std::time::Duration;

    fn contract(project: u64, value: f64) -> Contract {
        Contract {
            project: Some(project),
            total_project_value: value,
            contract_classification: Classification::PrivateFunding,
            ..Default::default()
        }
    }

    fn shared_cache() -> Arc<Mutex<SummaryCache>> {
        Arc::new(Mutex::new(SummaryCache::new(Duration::from_secs(60), 16)))
    }

    #[test]
    fn event_json_is_tagged() {
        let event = ContractEvent::siteplan_owners_updated(9);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "siteplan_owners_updated");
        assert_eq!(json["project_id"], 9);
        let back: ContractEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn publish_without_subscribers_is_harmless() {
        let bus = EventBus::new(4);
        assert_eq!(bus.publish(ContractEvent::contract_updated(1)), 0);
    }

    #[tokio::test]
    async fn subscribers_receive_events() {
        let bus = EventBus::new(4);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();
        assert_eq!(bus.publish(ContractEvent::contract_updated(3)), 2);
        assert_eq!(a.recv().await.unwrap().project_id(), 3);
        assert_eq!(b.recv().await.unwrap().project_id(), 3);
    }

    #[tokio::test]
    async fn invalidation_follows_events() {
        let cache = shared_cache();
        {
            let mut guard = cache.lock().await;
            guard.get_or_compute(&contract(1, 10.0), &[]).unwrap();
            guard.get_or_compute(&contract(2, 10.0), &[]).unwrap();
        }

        let bus = EventBus::new(8);
        let task = tokio::spawn(run_invalidation(cache.clone(), bus.subscribe()));
        bus.publish(ContractEvent::contract_updated(1));
        drop(bus);
        task.await.unwrap();

        let guard = cache.lock().await;
        assert_eq!(guard.len(), 1);
    }

    #[tokio::test]
    async fn lagged_subscriber_clears_everything() {
        let cache = shared_cache();
        {
            let mut guard = cache.lock().await;
            guard.get_or_compute(&contract(1, 10.0), &[]).unwrap();
            guard.get_or_compute(&contract(2, 10.0), &[]).unwrap();
        }

        let bus = EventBus::new(1);
        let rx = bus.subscribe();
        for _ in 0..3 {
            bus.publish(ContractEvent::variations_changed(99));
        }
        drop(bus);
        run_invalidation(cache.clone(), rx).await;

        assert!(cache.lock().await.is_empty());
    }
}
