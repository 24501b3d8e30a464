//! Per-connection query result cache.
//!
//! Results are stored under the fingerprint of the *unpaginated* query. A
//! paginated lookup strips its trailing `limit N [offset M]`, finds the full
//! result set and slices the requested window out of it.
//!
//! A cache belongs to one connection or session; it takes `&mut self` to
//! store, so sharing it between concurrently used connections requires the
//! caller to wrap it explicitly.
//!
//! ```rust
//! use quill_query::{QueryCache, QueryFingerprint};
//!
//! let mut cache = QueryCache::new();
//! let query = "select * from people where name like ?";
//! let rows = vec!["Andrey", "Andrey2", "Andrey3"];
//! cache.put_item(&QueryFingerprint::new(query, ["%Andrey%"]), rows);
//!
//! let page = QueryFingerprint::new(&format!("{} limit 1 offset 2", query), ["%Andrey%"]);
//! assert_eq!(cache.get_item(&page), Some(vec!["Andrey3"]));
//!
//! let other = QueryFingerprint::new(&format!("{} order by name", query), ["%Andrey%"]);
//! assert_eq!(cache.get_item(&other), None);
//! ```
//!
//! Entries are never refreshed: a window past the end of the cached rows
//! yields an empty page even if the table has grown since the entry was
//! stored. Call [`QueryCache::invalidate`] or [`QueryCache::clear`] after
//! writes.

mod key;
mod stats;

pub use key::{BaseFingerprint, QueryFingerprint};
pub use stats::{CacheMetrics, CacheStats};

use std::collections::HashMap;
use tracing::debug;

use crate::config::QuillConfig;
use crate::normalize::PageWindow;

/// Result cache keyed by base fingerprint.
#[derive(Debug)]
pub struct QueryCache<R> {
    entries: HashMap<BaseFingerprint, Vec<R>>,
    enabled: bool,
    log_access: bool,
    metrics: CacheMetrics,
}

impl<R: Clone> Default for QueryCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn window_bounds(window: PageWindow, len: usize) -> Option<(usize, usize)> {
    let offset = window
        .offset
        .map_or(0, |o| usize::try_from(o).unwrap_or(usize::MAX));
    if offset >= len {
        return None;
    }
    let limit = window
        .limit
        .map_or(len, |l| usize::try_from(l).unwrap_or(usize::MAX));
    Some((offset, offset.saturating_add(limit).min(len)))
}

impl<R: Clone> QueryCache<R> {
    /// Create an enabled cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            enabled: true,
            log_access: true,
            metrics: CacheMetrics::new(),
        }
    }

    /// Create a cache that always misses and never stores.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Create a cache from configuration.
    pub fn from_config(config: &QuillConfig) -> Self {
        Self {
            enabled: config.cache_enabled,
            log_access: config.log_cache_access,
            ..Self::new()
        }
    }

    /// Check whether the cache is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn the cache on or off. Turning it off drops every entry.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.entries.clear();
        }
        self.enabled = enabled;
    }

    /// Look up the rows for a possibly paginated query.
    ///
    /// Returns `None` on a miss. On a hit, returns the requested window of the
    /// cached rows, which is empty when the offset lies past the end.
    pub fn get_item(&self, fingerprint: &QueryFingerprint) -> Option<Vec<R>> {
        if !self.enabled {
            return None;
        }

        let (base, window) = fingerprint.split_window();
        match self.entries.get(&base) {
            Some(rows) => {
                self.metrics.record_hit();
                if self.log_access {
                    debug!(query = %fingerprint, "HIT");
                }
                Some(match window_bounds(window, rows.len()) {
                    Some((start, end)) => rows[start..end].to_vec(),
                    None => Vec::new(),
                })
            }
            None => {
                self.metrics.record_miss();
                if self.log_access {
                    debug!(query = %fingerprint, "MISS");
                }
                None
            }
        }
    }

    /// Store the full result set of a query.
    ///
    /// Any trailing pagination clause is stripped from the key, so `rows`
    /// must be the unpaginated result.
    pub fn put_item(&mut self, fingerprint: &QueryFingerprint, rows: Vec<R>) {
        if !self.enabled {
            return;
        }
        let base = fingerprint.base();
        if self.log_access {
            debug!(query = %base, rows = rows.len(), "PUT");
        }
        self.metrics.record_write();
        self.entries.insert(base, rows);
    }

    /// Drop the entry for a query, paginated or not.
    pub fn invalidate(&mut self, fingerprint: &QueryFingerprint) -> bool {
        let removed = self.entries.remove(&fingerprint.base()).is_some();
        if removed {
            self.metrics.record_invalidation();
        }
        removed
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        if count > 0 && self.log_access {
            debug!(entries = count, "cache cleared");
        }
    }

    /// Number of cached queries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the access counters.
    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot(self.entries.len())
    }

    /// Reset the access counters without touching entries.
    pub fn reset_stats(&self) {
        self.metrics.reset();
    }
}
