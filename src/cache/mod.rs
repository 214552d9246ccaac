//! Cache Module
//!
//! Provides the in-memory cache engine with TTL expiration and LRU eviction.

mod entry;
mod lru;
mod pool;
mod stats;
mod store;


// Re-export public types
pub use stats::{CacheStats, StatsSnapshot};
pub use store::CacheStore;
