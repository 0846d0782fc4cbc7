//! Recency Cache Module
//!
//! Fixed-capacity LRU store. Entries live in an [`Arena`] threaded by one
//! recency list; a key map points at arena slots.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::arena::{Arena, List};
use crate::cache::CacheEntry;

// == Recency Cache ==
/// Least Recently Used cache.
///
/// The recency list is ordered:
/// - Front = Least recently used (next eviction candidate)
/// - Back = Most recently used
///
/// A capacity of zero yields a store that silently ignores every `put`.
#[derive(Debug)]
pub struct RecencyCache<V> {
    /// Entry storage
    entries: Arena<CacheEntry<V>>,
    /// Key to arena slot
    index: HashMap<String, usize>,
    /// Recency order of occupied slots
    order: List,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Entries removed to make room
    evictions: u64,
}

impl<V> RecencyCache<V> {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arena::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            order: List::new(),
            capacity,
            evictions: 0,
        }
    }

    // == Put ==
    /// Inserts or replaces a value and marks it most recently used.
    ///
    /// Inserting a new key into a full cache first evicts the least
    /// recently used entry.
    pub fn put(&mut self, key: String, value: V) {
        if self.capacity == 0 {
            return;
        }

        if let Some(&idx) = self.index.get(&key) {
            self.entries.get_mut(idx).replace(value);
            self.entries.move_to_back(&mut self.order, idx);
            return;
        }

        if self.index.len() >= self.capacity {
            self.evict_oldest();
        }

        let idx = self.entries.insert(CacheEntry::new(key.clone(), value));
        self.entries.push_back(&mut self.order, idx);
        self.index.insert(key, idx);
    }

    // == Has ==
    /// Checks membership without touching recency.
    pub fn has(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Peek ==
    /// Returns the entry for `key` without touching recency.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.index.get(key).map(|&idx| self.entries.get(idx))
    }

    /// Keys from least to most recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter(&self.order).map(|entry| entry.key.as_str())
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

    // == Evict Oldest ==
    fn evict_oldest(&mut self) {
        let idx = self
            .order
            .front()
            .expect("full recency cache has no least-recently-used entry");
        self.entries.unlink(&mut self.order, idx);
        let entry = self.entries.remove(idx);
        self.index.remove(&entry.key);
        self.evictions += 1;
        debug!(key = %entry.key, "recency cache evicted entry");
    }
}

impl<V: Clone> RecencyCache<V> {
    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    ///
    /// A miss has no side effect.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let idx = *self.index.get(key)?;
        let entry = self.entries.get_mut(idx);
        entry.touch();
        let value = entry.value.clone();
        self.entries.move_to_back(&mut self.order, idx);
        Some(value)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys(cache: &RecencyCache<i32>) -> Vec<String> {
        cache.keys().map(str::to_string).collect()
    }

    #[test]
    fn test_recency_new() {
        let cache: RecencyCache<i32> = RecencyCache::new(3);
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.capacity(), 3);
    }

    #[test]
    fn test_recency_put_and_get() {
        let mut cache = RecencyCache::new(3);

        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);

        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_recency_evicts_first_inserted() {
        let mut cache = RecencyCache::new(3);

        for (i, key) in ["a", "b", "c", "d"].into_iter().enumerate() {
            cache.put(key.to_string(), i as i32);
        }

        assert_eq!(cache.len(), 3);
        assert!(!cache.has("a"));
        assert!(cache.has("b"));
        assert!(cache.has("c"));
        assert!(cache.has("d"));
        assert_eq!(cache.evictions(), 1);
    }

    #[test]
    fn test_recency_get_refreshes_entry() {
        let mut cache = RecencyCache::new(3);
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);
        cache.put("c".to_string(), 3);

        // a becomes most recent, b is now the oldest
        cache.get("a");
        cache.put("d".to_string(), 4);

        assert!(cache.has("a"));
        assert!(!cache.has("b"));
        assert!(cache.has("c"));
        assert!(cache.has("d"));
    }

    #[test]
    fn test_recency_put_existing_replaces_and_refreshes() {
        let mut cache = RecencyCache::new(2);
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);

        cache.put("a".to_string(), 10);
        cache.put("c".to_string(), 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(10));
        assert!(!cache.has("b"));
        assert_eq!(cache.evictions(), 1);
    }

    #[test]
    fn test_recency_order_after_multiple_touches() {
        let mut cache = RecencyCache::new(3);
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);
        cache.put("c".to_string(), 3);

        cache.get("a");
        cache.get("c");
        cache.get("b");

        assert_eq!(keys(&cache), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_recency_miss_has_no_side_effect() {
        let mut cache = RecencyCache::new(2);
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);

        assert_eq!(cache.get("zzz"), None);
        assert_eq!(keys(&cache), vec!["a", "b"]);
    }

    #[test]
    fn test_recency_has_does_not_touch() {
        let mut cache = RecencyCache::new(2);
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);

        for _ in 0..5 {
            assert!(cache.has("a"));
        }
        assert_eq!(cache.peek("a").map(|e| e.access_count), Some(1));

        // a was never refreshed, so it is still evicted first
        cache.put("c".to_string(), 3);
        assert!(!cache.has("a"));
    }

    #[test]
    fn test_recency_zero_capacity_is_noop() {
        let mut cache = RecencyCache::new(0);

        cache.put("a".to_string(), 1);

        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.evictions(), 0);
    }

    #[test]
    fn test_recency_capacity_one() {
        let mut cache = RecencyCache::new(1);

        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
    }
}
