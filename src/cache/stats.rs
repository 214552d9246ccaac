//! Cache Statistics Module
//!
//! Counting metrics sink tracking hits, misses, evictions and the rest of the
//! cache events.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::metrics::Metrics;

// == Cache Stats ==
/// Lock-free [`Metrics`] implementation that counts every event.
///
/// Share it with the cache through an `Arc` and read it with
/// [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    errors: AtomicU64,
    adds: AtomicU64,
    updates: AtomicU64,
    evictions: AtomicU64,
    deletes: AtomicU64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Snapshot ==
    /// Copies the current counter values.
    ///
    /// Counters are read individually, so a snapshot taken under concurrent
    /// load may mix events from slightly different instants.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            adds: self.adds.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
        }
    }
}

impl Metrics for CacheStats {
    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    fn add(&self) {
        self.adds.fetch_add(1, Ordering::Relaxed);
    }

    fn update(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    fn evict(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    fn delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }
}

// == Stats Snapshot ==
/// Point-in-time copy of [`CacheStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of detected internal inconsistencies
    pub errors: u64,
    /// Number of brand-new keys stored
    pub adds: u64,
    /// Number of in-place refreshes of existing keys
    pub updates: u64,
    /// Number of entries removed by capacity pressure or lazy expiration
    pub evictions: u64,
    /// Number of entries removed for any reason
    pub deletes: u64,
}

impl StatsSnapshot {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Live Entries ==
    /// Entries added minus entries removed.
    pub fn live_entries(&self) -> i64 {
        self.adds as i64 - self.deletes as i64
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new();
        assert_eq!(stats.snapshot().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let stats = CacheStats::new();
        stats.hit();
        stats.hit();
        stats.hit();
        assert_eq!(stats.snapshot().hit_rate(), 1.0);
    }

    #[test]
    fn test_hit_rate_all_misses() {
        let stats = CacheStats::new();
        stats.miss();
        stats.miss();
        assert_eq!(stats.snapshot().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let stats = CacheStats::new();
        stats.hit();
        stats.miss();
        assert_eq!(stats.snapshot().hit_rate(), 0.5);
    }

    #[test]
    fn test_record_eviction() {
        let stats = CacheStats::new();
        stats.evict();
        stats.evict();
        assert_eq!(stats.snapshot().evictions, 2);
    }

    #[test]
    fn test_live_entries() {
        let stats = CacheStats::new();
        stats.add();
        stats.add();
        stats.add();
        stats.update();
        stats.delete();
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.live_entries(), 2);
        assert_eq!(snapshot.updates, 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let stats = CacheStats::new();
        stats.hit();
        stats.error();

        let json = serde_json::to_value(stats.snapshot()).unwrap();
        assert_eq!(json["hits"], 1);
        assert_eq!(json["errors"], 1);
        assert_eq!(json["misses"], 0);
        assert!(json.get("deletes").is_some());
    }
}
