//! Cache Statistics Module
//!
//! Tracks cache activity: hits, misses, invalidation round-trips and removals.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache activity counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of reads that returned an entry
    pub hits: u64,
    /// Number of reads that returned nothing (absent or expired)
    pub misses: u64,
    /// Subset of misses caused by an expired entry
    pub expired_reads: u64,
    /// Number of times a stale entry triggered the invalidation listener
    pub invalidation_notices: u64,
    /// Number of expired entries removed by purge
    pub expirations: u64,
    /// Number of live entries evicted by purge to honour the size bound
    pub evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Counts an expired read as a miss too.
    pub fn record_expired_read(&mut self) {
        self.expired_reads += 1;
        self.misses += 1;
    }

    pub fn record_invalidation_notice(&mut self) {
        self.invalidation_notices += 1;
    }

    /// Records the outcome of one purge run.
    pub fn record_purge(&mut self, expired: usize, evicted: usize) {
        self.expirations += expired as u64;
        self.evictions += evicted as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
