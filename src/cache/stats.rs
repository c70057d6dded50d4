//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, evictions and
//! byte-level utilization.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key absent or expired)
    pub misses: u64,
    /// Number of entries evicted to make room for new values
    pub evictions: u64,
    /// Current number of entries in the cache
    pub entry_count: usize,
    /// Sum of serialized sizes of all stored entries
    pub current_size_bytes: usize,
    /// Configured capacity in bytes
    pub max_size_bytes: usize,
}

impl CacheStats {
    /// Creates a new CacheStats with all counters at zero.
    pub fn new(max_size_bytes: usize) -> Self {
        Self {
            max_size_bytes,
            ..Self::default()
        }
    }

    /// Hit rate as a percentage of all lookups, 0.0 when none occurred.
    pub fn hit_rate_percent(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }

    /// Fraction of capacity in use, as a percentage.
    pub fn utilization_percent(&self) -> f64 {
        if self.max_size_bytes == 0 {
            0.0
        } else {
            self.current_size_bytes as f64 / self.max_size_bytes as f64 * 100.0
        }
    }

    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Resets counters while keeping the configured capacity.
    pub fn reset(&mut self) {
        *self = Self::new(self.max_size_bytes);
    }
}
