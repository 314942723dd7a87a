//! Eviction Policy Module
//!
//! Orders entries for eviction and records accesses for the active policy.

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::{CacheEntry, Cacheable};

// == Eviction Policy ==
/// Rule used to pick which entries to drop when the cache is over capacity.
///
/// Both orderings are ascending: the first entry in sorted order is the
/// first to be evicted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Least frequently used: lowest hit count goes first
    Lfu,
    /// Least recently used: oldest access stamp goes first
    #[default]
    Lru,
}

impl EvictionPolicy {
    /// Resolves a policy name. `"lfu"` in any case selects LFU; anything
    /// else falls back to LRU.
    pub fn parse(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("lfu") {
            EvictionPolicy::Lfu
        } else {
            EvictionPolicy::Lru
        }
    }

    // == Compare ==
    /// Total ordering of two entries for eviction.
    ///
    /// Ties on the primary key are broken by expiration, sooner first, with
    /// a missing expiration sorting after every timestamp.
    pub fn compare<V: Cacheable>(&self, a: &CacheEntry<V>, b: &CacheEntry<V>) -> Ordering {
        let primary = match self {
            EvictionPolicy::Lfu => a.frequency.cmp(&b.frequency),
            EvictionPolicy::Lru => a.last_access.cmp(&b.last_access),
        };
        primary.then_with(|| compare_expiration(a.expires_at(), b.expires_at()))
    }

    /// Sorts entries so that the eviction candidates come first.
    ///
    /// The sort is stable, equal entries keep their relative order.
    pub fn sort<V: Cacheable>(&self, entries: &mut [CacheEntry<V>]) {
        entries.sort_by(|a, b| self.compare(a, b));
    }

    // == Record Access ==
    /// Applies the policy's bookkeeping for a successful read.
    pub fn record_access<V: Cacheable>(&self, entry: &mut CacheEntry<V>, now: DateTime<Utc>) {
        match self {
            EvictionPolicy::Lfu => entry.frequency = entry.frequency.saturating_add(1),
            // Concurrent readers may stamp out of order; never move backwards
            EvictionPolicy::Lru => entry.last_access = entry.last_access.max(now),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionPolicy::Lfu => "lfu",
            EvictionPolicy::Lru => "lru",
        }
    }
}

/// Expiration order where `None` means "never" and sorts last.
fn compare_expiration(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl FromStr for EvictionPolicy {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
