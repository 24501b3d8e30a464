//! Cache access metrics.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Thread-safe counters for one cache.
#[derive(Debug)]
pub struct CacheMetrics {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    invalidations: AtomicU64,
    created_at: Instant,
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
            created_at: Instant::now(),
        }
    }

    /// Record a cache hit.
    #[inline]
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cache miss.
    #[inline]
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a stored result set.
    #[inline]
    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a removed entry.
    #[inline]
    pub fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of the current stats.
    pub fn snapshot(&self, entries: usize) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let queries = hits + misses;

        CacheStats {
            queries,
            hits,
            misses,
            writes: self.writes.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            hit_rate: if queries > 0 {
                hits as f64 / queries as f64
            } else {
                0.0
            },
            entries,
            uptime: self.created_at.elapsed(),
        }
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
        self.invalidations.store(0, Ordering::Relaxed);
    }
}

/// A snapshot of cache statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups served (hits plus misses).
    pub queries: u64,
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of stored result sets.
    pub writes: u64,
    /// Number of removed entries.
    pub invalidations: u64,
    /// Hit rate (0.0 - 1.0).
    pub hit_rate: f64,
    /// Number of entries in the cache.
    pub entries: usize,
    /// Time since the cache was created.
    pub uptime: Duration,
}

impl CacheStats {
    /// Format as a human-readable string.
    pub fn summary(&self) -> String {
        format!(
            "Cache Stats: {} queries, {} hits, {} misses ({:.1}% hit rate), {} entries",
            self.queries,
            self.hits,
            self.misses,
            self.hit_rate * 100.0,
            self.entries
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let metrics = CacheMetrics::new();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();

        let stats = metrics.snapshot(2);
        assert_eq!(stats.queries, 4);
        assert_eq!(stats.entries, 2);
        assert!((stats.hit_rate - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_reset() {
        let metrics = CacheMetrics::new();
        metrics.record_write();
        metrics.record_miss();
        metrics.reset();

        let stats = metrics.snapshot(0);
        assert_eq!(stats.queries, 0);
        assert_eq!(stats.writes, 0);
        assert_eq!(stats.hit_rate, 0.0);
    }

    #[test]
    fn test_summary() {
        let metrics = CacheMetrics::new();
        metrics.record_hit();
        let summary = metrics.snapshot(1).summary();
        assert!(summary.contains("1 hits"));
        assert!(summary.contains("100.0% hit rate"));
    }
}
