//! Memo cache for contract summaries.
//!
//! Keys are the canonical JSON of `(contract, variations)`, so two requests
//! with equal inputs share an entry no matter where they came from. Entries
//! expire after a TTL and can be dropped per project when an update event
//! arrives.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use sitework_core::{Contract, ContractSummary, Variation, summarize};
use tracing::debug;

use crate::CacheError;
use crate::events::ContractEvent;

struct Entry {
    summary: ContractSummary,
    project: Option<u64>,
    created_at: Instant,
    seq: u64,
}

/// Hit/miss counters and current size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

pub struct SummaryCache {
    ttl: Duration,
    max_entries: usize,
    entries: HashMap<String, Entry>,
    next_seq: u64,
    hits: u64,
    misses: u64,
}

impl SummaryCache {
    /// `max_entries == 0` disables caching; every call recomputes.
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            entries: HashMap::new(),
            next_seq: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached summary for these inputs, computing it on a miss.
    pub fn get_or_compute(
        &mut self,
        contract: &Contract,
        variations: &[Variation],
    ) -> Result<ContractSummary, CacheError> {
        let key = cache_key(contract, variations)?;
        self.evict_expired();

        if let Some(entry) = self.entries.get(&key) {
            self.hits += 1;
            debug!(project = ?entry.project, "summary cache hit");
            return Ok(entry.summary.clone());
        }

        self.misses += 1;
        let summary = summarize(contract, variations);
        self.insert(key, contract.project, summary.clone());
        Ok(summary)
    }

    fn insert(&mut self, key: String, project: Option<u64>, summary: ContractSummary) {
        if self.max_entries == 0 {
            return;
        }
        if self.entries.len() >= self.max_entries
            && let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.seq)
                .map(|(k, _)| k.clone())
        {
            self.entries.remove(&oldest);
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            key,
            Entry {
                summary,
                project,
                created_at: Instant::now(),
                seq,
            },
        );
    }

    fn evict_expired(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, e| e.created_at.elapsed() <= ttl);
    }

    /// Drop every entry computed for `project_id`. Returns how many went.
    pub fn invalidate_project(&mut self, project_id: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.project != Some(project_id));
        before - self.entries.len()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Invalidate whatever `event` makes stale.
    pub fn apply(&mut self, event: &ContractEvent) -> usize {
        self.invalidate_project(event.project_id())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}

fn cache_key(contract: &Contract, variations: &[Variation]) -> Result<String, CacheError> {
    Ok(serde_json::to_string(&(contract, variations))?)
}
