//! Frequency Cache Module
//!
//! Fixed-capacity LFU store with O(1) `get`/`put`.
//!
//! Entries are grouped into buckets by access count. Each bucket is a list
//! in the shared [`Arena`], ordered by arrival into the bucket, which is
//! also the order of last access among entries of that count. Eviction
//! takes the front of the minimum bucket: lowest count first, oldest touch
//! among equals.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::arena::{Arena, List};
use crate::cache::CacheEntry;

// == Frequency Cache ==
/// Least Frequently Used cache with oldest-touch tie-breaking.
#[derive(Debug)]
pub struct FrequencyCache<V> {
    /// Entry storage
    entries: Arena<CacheEntry<V>>,
    /// Key to arena slot
    index: HashMap<String, usize>,
    /// Access count to the entries currently holding that count
    buckets: HashMap<u64, List>,
    /// Smallest access count with a non-empty bucket
    min_count: u64,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Entries removed to make room
    evictions: u64,
}

impl<V> FrequencyCache<V> {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arena::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            buckets: HashMap::new(),
            min_count: 0,
            capacity,
            evictions: 0,
        }
    }

    // == Put ==
    /// Inserts or replaces a value.
    ///
    /// Replacing counts as an access. A new key starts at count 1; if the
    /// cache is full, exactly one entry is evicted first.
    pub fn put(&mut self, key: String, value: V) {
        if self.capacity == 0 {
            return;
        }

        if let Some(&idx) = self.index.get(&key) {
            self.entries.get_mut(idx).value = value;
            self.bump(idx);
            return;
        }

        if self.index.len() >= self.capacity {
            self.evict_least_frequent();
        }

        let idx = self.entries.insert(CacheEntry::new(key.clone(), value));
        self.attach(idx, 1);
        self.min_count = 1;
        self.index.insert(key, idx);
    }

    // == Has ==
    /// Checks membership without touching the access count.
    pub fn has(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Peek ==
    /// Returns the entry for `key` without touching it.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.index.get(key).map(|&idx| self.entries.get(idx))
    }

    /// Key that the next insertion into a full cache would evict.
    pub fn eviction_candidate(&self) -> Option<&str> {
        let idx = self.buckets.get(&self.min_count)?.front()?;
        Some(self.entries.get(idx).key.as_str())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries evicted since construction.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    // == Bucket Maintenance ==
    /// Moves an entry one bucket up and records the access.
    fn bump(&mut self, idx: usize) {
        let count = self.entries.get(idx).access_count;
        self.detach(idx, count);
        self.entries.get_mut(idx).touch();
        self.attach(idx, count + 1);
    }

    fn attach(&mut self, idx: usize, count: u64) {
        let bucket = self.buckets.entry(count).or_default();
        self.entries.push_back(bucket, idx);
    }

    fn detach(&mut self, idx: usize, count: u64) {
        let bucket = self
            .buckets
            .get_mut(&count)
            .expect("entry is missing from its frequency bucket");
        self.entries.unlink(bucket, idx);
        let emptied = bucket.is_empty();

        if emptied {
            self.buckets.remove(&count);
            if self.min_count == count {
                self.min_count = count + 1;
            }
        }
    }

    // == Evict ==
    fn evict_least_frequent(&mut self) {
        let count = self.min_count;
        let idx = self
            .buckets
            .get(&count)
            .and_then(List::front)
            .expect("full frequency cache has no minimum bucket");
        self.detach(idx, count);
        let entry = self.entries.remove(idx);
        self.index.remove(&entry.key);
        self.evictions += 1;
        debug!(key = %entry.key, access_count = count, "frequency cache evicted entry");
    }
}

impl<V: Clone> FrequencyCache<V> {
    // == Get ==
    /// Returns the value for `key`, bumping its access count.
    ///
    /// A miss has no side effect.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let idx = *self.index.get(key)?;
        self.bump(idx);
        Some(self.entries.get(idx).value.clone())
    }
}
