//! Cache Facade Module
//!
//! Read-through orchestration over the two tiers: recency first, then
//! frequency, else compute and co-insert into both.

use serde::Serialize;
use tracing::debug;

use crate::cache::{CacheStats, FrequencyCache, RecencyCache};

// == Source ==
/// Where a lookup was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    RecencyHit,
    FrequencyHit,
    Miss,
}

impl Source {
    /// True for either cache tier.
    pub fn is_cached(self) -> bool {
        !matches!(self, Source::Miss)
    }

    /// Name of the answering tier, if any.
    pub fn tier(self) -> Option<&'static str> {
        match self {
            Source::RecencyHit => Some("recency"),
            Source::FrequencyHit => Some("frequency"),
            Source::Miss => None,
        }
    }
}

// == Cache Facade ==
/// Two independently evolving caches over one key space.
///
/// A hit in one tier is never propagated into the other; only a miss
/// writes, and it writes to both.
#[derive(Debug)]
pub struct CacheFacade<V> {
    recency: RecencyCache<V>,
    frequency: FrequencyCache<V>,
    stats: CacheStats,
}

impl<V: Clone> CacheFacade<V> {
    // == Constructor ==
    /// Creates a facade over two empty tiers.
    pub fn new(recency_capacity: usize, frequency_capacity: usize) -> Self {
        Self {
            recency: RecencyCache::new(recency_capacity),
            frequency: FrequencyCache::new(frequency_capacity),
            stats: CacheStats::new(),
        }
    }

    // == Lookup ==
    /// Checks the recency tier, then the frequency tier.
    ///
    /// Returns `None` on a miss; the caller computes the value and hands it
    /// back through [`CacheFacade::populate`].
    pub fn lookup(&mut self, key: &str) -> Option<(V, Source)> {
        let hit = if let Some(value) = self.recency.get(key) {
            Some((value, Source::RecencyHit))
        } else {
            self.frequency
                .get(key)
                .map(|value| (value, Source::FrequencyHit))
        };

        let source = hit.as_ref().map_or(Source::Miss, |(_, source)| *source);
        self.stats.record(source);
        debug!(key, ?source, "cache lookup");
        hit
    }

    // == Populate ==
    /// Inserts the same value into both tiers under `key`.
    pub fn populate(&mut self, key: String, value: V) {
        self.recency.put(key.clone(), value.clone());
        self.frequency.put(key, value);
    }

    // == Get Or Compute ==
    /// Looks `key` up and, on a miss, computes and populates it.
    ///
    /// A failed computation is returned as-is and nothing is cached.
    pub fn get_or_compute<E, F>(&mut self, key: &str, compute: F) -> Result<(V, Source), E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(hit) = self.lookup(key) {
            return Ok(hit);
        }

        let value = compute()?;
        self.populate(key.to_string(), value.clone());
        debug!(key, "fresh value cached");
        Ok((value, Source::Miss))
    }

    // == Stats ==
    /// Returns current statistics for both tiers.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.recency_evictions = self.recency.evictions();
        stats.frequency_evictions = self.frequency.evictions();
        stats.recency_entries = self.recency.len();
        stats.frequency_entries = self.frequency.len();
        stats
    }

    pub fn recency(&self) -> &RecencyCache<V> {
        &self.recency
    }

    pub fn frequency(&self) -> &FrequencyCache<V> {
        &self.frequency
    }
}
