//! Cache Statistics Module
//!
//! Tracks lookup outcomes per tier and eviction counts for both caches.

use serde::Serialize;

use crate::cache::Source;

// == Cache Stats ==
/// Tracks cache performance metrics across both tiers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups answered by the recency tier
    pub recency_hits: u64,
    /// Lookups answered by the frequency tier
    pub frequency_hits: u64,
    /// Lookups neither tier could answer
    pub misses: u64,
    /// Entries evicted from the recency tier
    pub recency_evictions: u64,
    /// Entries evicted from the frequency tier
    pub frequency_evictions: u64,
    /// Current number of entries in the recency tier
    pub recency_entries: usize,
    /// Current number of entries in the frequency tier
    pub frequency_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total lookups answered from either tier.
    pub fn hits(&self) -> u64 {
        self.recency_hits + self.frequency_hits
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits() + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }

    // == Record Lookup ==
    /// Counts one lookup outcome.
    pub fn record(&mut self, source: Source) {
        match source {
            Source::RecencyHit => self.recency_hits += 1,
            Source::FrequencyHit => self.frequency_hits += 1,
            Source::Miss => self.misses += 1,
        }
    }
}
