use dashmap::DashMap;
use dns_harness_domain::ResponderId;
use std::collections::BTreeMap;

/// Number of scripted responses served, per responder.
#[derive(Debug, Default)]
pub struct ResponseCounter {
    counts: DashMap<ResponderId, u64>,
}

impl ResponseCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self, responder: &ResponderId) {
        *self.counts.entry(responder.clone()).or_insert(0) += 1;
    }

    /// Zero when the responder has not served anything yet.
    pub fn get(&self, responder: &ResponderId) -> u64 {
        self.counts.get(responder).map_or(0, |count| *count)
    }

    /// Set every known responder back to zero. Keys are kept, so a snapshot
    /// taken after a reset still lists responders that served earlier runs.
    pub fn reset(&self) {
        for mut count in self.counts.iter_mut() {
            *count = 0;
        }
    }

    pub fn snapshot(&self) -> BTreeMap<ResponderId, u64> {
        self.counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|entry| *entry.value()).sum()
    }
}
