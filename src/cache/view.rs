//! Entry View Module
//!
//! Read-only snapshots handed to callers instead of live entries.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::{CacheEntry, Cacheable};

// == Entry View ==
/// Snapshot of a cached entry taken at the moment it was returned.
///
/// Later reads, writes or invalidations do not show through an existing view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryView<V> {
    key: String,
    data: V,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    valid: bool,
    frequency: u64,
    last_access: DateTime<Utc>,
}

impl<V: Cacheable> EntryView<V> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn data(&self) -> &V {
        &self.data
    }

    pub fn into_data(self) -> V {
        self.data
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Validity as it was when the snapshot was taken.
    ///
    /// A `false` here means the entry was marked stale and no listener
    /// refreshed it.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// LFU hit count at snapshot time.
    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    /// LRU access stamp at snapshot time.
    pub fn last_access(&self) -> DateTime<Utc> {
        self.last_access
    }

    /// Builds a fresh, valid entry from this snapshot, ready to be edited
    /// and written back.
    pub fn to_entry(&self) -> CacheEntry<V> {
        let entry = CacheEntry::created_at(self.key.clone(), self.data.clone(), self.created_at);
        match self.expires_at {
            Some(at) => entry.with_expiration(at),
            None => entry,
        }
    }
}

impl<V: Cacheable> From<&CacheEntry<V>> for EntryView<V> {
    fn from(entry: &CacheEntry<V>) -> Self {
        Self {
            key: entry.key().to_string(),
            data: entry.data().clone(),
            created_at: entry.created(),
            expires_at: entry.expires_at(),
            valid: entry.is_valid(),
            frequency: entry.frequency(),
            last_access: entry.last_access(),
        }
    }
}
