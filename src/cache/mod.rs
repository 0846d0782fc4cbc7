//! Cache Module
//!
//! Two-tier in-memory caching: a recency (LRU) tier and a frequency (LFU)
//! tier behind a read-through facade.

mod arena;
mod entry;
mod facade;
mod lfu;
mod lru;
mod stats;


// Re-export public types
pub use entry::CacheEntry;
pub use facade::{CacheFacade, Source};
pub use lfu::FrequencyCache;
pub use lru::RecencyCache;
pub use stats::CacheStats;
