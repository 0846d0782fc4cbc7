//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with access metadata.

use std::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with value and access metadata.
///
/// An entry is owned by exactly one cache; the recency and frequency tiers
/// each hold their own copy of a co-inserted value.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The key this entry is stored under
    pub key: String,
    /// The stored value
    pub value: V,
    /// Number of `get`/`put` touches, starting at 1 on insertion
    pub access_count: u64,
    /// Monotonic time of the most recent touch
    pub last_access: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry with an access count of 1.
    pub fn new(key: String, value: V) -> Self {
        Self {
            key,
            value,
            access_count: 1,
            last_access: Instant::now(),
        }
    }

    // == Touch ==
    /// Records one access: bumps the count and refreshes the access time.
    pub fn touch(&mut self) {
        self.access_count += 1;
        self.last_access = Instant::now();
    }

    // == Replace ==
    /// Replaces the value and counts the update as an access.
    pub fn replace(&mut self, value: V) {
        self.value = value;
        self.touch();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("key".to_string(), 7);

        assert_eq!(entry.key, "key");
        assert_eq!(entry.value, 7);
        assert_eq!(entry.access_count, 1);
    }

    #[test]
    fn test_touch_bumps_count_and_time() {
        let mut entry = CacheEntry::new("key".to_string(), "v");
        let created = entry.last_access;

        entry.touch();
        entry.touch();

        assert_eq!(entry.access_count, 3);
        assert!(entry.last_access >= created);
    }

    #[test]
    fn test_replace_counts_as_access() {
        let mut entry = CacheEntry::new("key".to_string(), "old");

        entry.replace("new");

        assert_eq!(entry.value, "new");
        assert_eq!(entry.access_count, 2);
    }
}
