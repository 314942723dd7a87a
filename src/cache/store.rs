//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with policy-driven eviction,
//! expiration and invalidation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::cache::{
    CacheEntry, CacheStats, Cacheable, EntryView, EvictionPolicy, InvalidationListener,
};
use crate::clock::{Clock, SystemClock};
use crate::error::{CacheError, Result};

/// An entry behind its own lock so access stamping never needs the map lock
/// in write mode.
type Slot<V> = Arc<Mutex<CacheEntry<V>>>;

/// Upper bound on the map capacity reserved up front; `max_size` is only a hint.
const INITIAL_CAPACITY_CAP: usize = 1024;

// == Purge Report ==
/// Outcome of a single `Cache::purge` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    /// Entries removed because they had expired
    pub expired: usize,
    /// Live entries removed to get back under `max_size`
    pub evicted: usize,
}

impl PurgeReport {
    pub fn total(&self) -> usize {
        self.expired + self.evicted
    }
}

// == Cache ==
/// Bounded in-memory cache with expiration, invalidation and LFU/LRU eviction.
///
/// All methods take `&self`; share the cache between threads with an `Arc`.
///
/// Lock order is always map lock first, then a single entry lock.
pub struct Cache<V: Cacheable> {
    entries: RwLock<HashMap<String, Slot<V>>>,
    policy: EvictionPolicy,
    max_size: usize,
    listener: Option<Arc<dyn InvalidationListener<V>>>,
    clock: Arc<dyn Clock>,
    stats: Mutex<CacheStats>,
}

impl<V: Cacheable> Cache<V> {
    // == Constructor ==
    /// Creates an empty cache bounded to `max_size` entries after each purge.
    pub fn new(max_size: usize, policy: EvictionPolicy) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_capacity(
                max_size.min(INITIAL_CAPACITY_CAP),
            )),
            policy,
            max_size,
            listener: None,
            clock: Arc::new(SystemClock),
            stats: Mutex::new(CacheStats::new()),
        }
    }

    /// Registers the collaborator notified when a read meets a stale entry.
    pub fn with_listener<L>(mut self, listener: L) -> Self
    where
        L: InvalidationListener<V> + 'static,
    {
        self.listener = Some(Arc::new(listener));
        self
    }

    /// Replaces the time source used for expiration and LRU stamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // == Write ==
    /// Stores a copy of `entry` under its key.
    ///
    /// Overwriting an existing key replaces the data but keeps the stored
    /// hit count and access stamp. When both the stored and the incoming
    /// payload are auditable their author and timestamp must match, else
    /// the write fails with `CacheError::ConcurrentModification`.
    ///
    /// Size is not enforced here; `purge` is the enforcement point.
    pub fn write(&self, mut entry: CacheEntry<V>) -> Result<()> {
        if entry.key().is_empty() {
            warn!("Rejected write of entry without a key");
            return Err(CacheError::MissingKey);
        }
        if !entry.is_valid() {
            warn!(key = entry.key(), "Rejected write of invalid entry");
            return Err(CacheError::InvalidEntry(entry.key().to_string()));
        }

        let key = entry.key().to_string();
        let mut entries = self.entries.write();

        // Lookup, check and store all happen under the map write lock
        if let Some(slot) = entries.get(&key) {
            let mut stored = slot.lock();
            check_audit(&key, &*stored, &entry)?;
            entry.inherit_usage(&*stored);
            *stored = entry;
            debug!(key = %key, "Overwrote cache entry");
            return Ok(());
        }

        entry.reset_usage(self.clock.now());
        entries.insert(key.clone(), Arc::new(Mutex::new(entry)));
        let count = entries.len();
        drop(entries);

        debug!(key = %key, size = count, "Stored cache entry");
        Ok(())
    }

    // == Read ==
    /// Returns a snapshot of the entry stored under `key`.
    ///
    /// Returns `None` when the key is absent or its entry has expired. A
    /// stale entry is first handed to the invalidation listener and then
    /// looked up again. Every successful read counts as an access for the
    /// eviction policy.
    pub fn read(&self, key: &str) -> Option<EntryView<V>> {
        let Some(mut slot) = self.slot(key) else {
            self.stats.lock().record_miss();
            return None;
        };

        let (expired, valid) = {
            let entry = slot.lock();
            (entry.has_expired_at(self.clock.now()), entry.is_valid())
        };
        if expired {
            debug!(key, "Read of expired entry");
            self.stats.lock().record_expired_read();
            return None;
        }

        if !valid {
            debug!(key, "Entry is stale, notifying invalidation listener");
            if let Some(listener) = &self.listener {
                self.stats.lock().record_invalidation_notice();
                listener.entry_invalidated(self, key);
            }

            match self.slot(key) {
                Some(refetched) => slot = refetched,
                None => {
                    self.stats.lock().record_miss();
                    return None;
                }
            }
        }

        let mut entry = slot.lock();
        let now = self.clock.now();
        if entry.has_expired_at(now) {
            drop(entry);
            self.stats.lock().record_expired_read();
            return None;
        }
        self.policy.record_access(&mut *entry, now);
        let view = EntryView::from(&*entry);
        drop(entry);

        self.stats.lock().record_hit();
        Some(view)
    }

    // == Invalidate All ==
    /// Marks every stored entry invalid.
    ///
    /// Holds the map write lock for the whole sweep, so no read or write
    /// observes a partially invalidated cache. Expiration dates are untouched.
    pub fn invalidate_all(&self) {
        let entries = self.entries.write();
        for slot in entries.values() {
            slot.lock().set_valid(false);
        }
        info!(count = entries.len(), "Invalidated all cache entries");
    }

    // == Purge ==
    /// Removes expired entries, then evicts the lowest-ranked live entries
    /// until at most `max_size` remain.
    ///
    /// Decisions are made on a snapshot; an entry is only removed if the key
    /// still maps to the same slot, and expired candidates are re-checked.
    pub fn purge(&self) -> PurgeReport {
        let now = self.clock.now();

        let snapshot: Vec<(Slot<V>, CacheEntry<V>)> = {
            let entries = self.entries.read();
            entries
                .values()
                .map(|slot| (Arc::clone(slot), slot.lock().clone()))
                .collect()
        };

        let (expired, mut live): (Vec<_>, Vec<_>) = snapshot
            .into_iter()
            .partition(|(_, entry)| entry.has_expired_at(now));

        let overflow = live.len().saturating_sub(self.max_size);
        if overflow > 0 {
            live.sort_by(|(_, a), (_, b)| self.policy.compare(a, b));
            live.truncate(overflow);
        } else {
            live.clear();
        }

        if expired.is_empty() && live.is_empty() {
            return PurgeReport::default();
        }

        let mut report = PurgeReport::default();
        let mut entries = self.entries.write();
        for (slot, stale) in &expired {
            let still_expired = entries
                .get(stale.key())
                .filter(|current| Arc::ptr_eq(*current, slot))
                .is_some_and(|current| current.lock().has_expired_at(now));
            if still_expired {
                entries.remove(stale.key());
                report.expired += 1;
            }
        }
        for (slot, victim) in &live {
            let unchanged = entries
                .get(victim.key())
                .is_some_and(|current| Arc::ptr_eq(current, slot));
            if unchanged {
                entries.remove(victim.key());
                report.evicted += 1;
            }
        }
        let count = entries.len();
        drop(entries);

        self.stats.lock().record_purge(report.expired, report.evicted);

        info!(
            expired = report.expired,
            evicted = report.evicted,
            size = count,
            policy = %self.policy,
            "Purged cache"
        );
        report
    }

    // == Remove ==
    /// Removes an entry by key. Returns whether one was stored.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Whether the key is stored, expired or not. Not an access.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    // == Size ==
    /// Number of stored entries, including expired ones not yet purged.
    pub fn size(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    // == Stats ==
    /// Returns current cache statistics.
    ///
    /// `total_entries` is taken from the map at call time.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.lock().clone();
        stats.set_total_entries(self.size());
        stats
    }

    /// Raw slot lookup. Never exposed: callers only ever see snapshots.
    fn slot(&self, key: &str) -> Option<Slot<V>> {
        self.entries.read().get(key).cloned()
    }
}

/// Optimistic concurrency check between the stored and the incoming entry.
///
/// Only applies when both payloads expose audit metadata.
fn check_audit<V: Cacheable>(
    key: &str,
    stored: &CacheEntry<V>,
    incoming: &CacheEntry<V>,
) -> Result<()> {
    let (Some(stored), Some(incoming)) =
        (stored.data().as_auditable(), incoming.data().as_auditable())
    else {
        return Ok(());
    };

    if stored.last_modified_by() != incoming.last_modified_by()
        || stored.last_modified_at() != incoming.last_modified_at()
    {
        warn!(key, "Concurrent modification detected");
        return Err(CacheError::ConcurrentModification {
            key: key.to_string(),
            stored_by: stored.last_modified_by().to_string(),
            stored_at: stored.last_modified_at(),
            incoming_by: incoming.last_modified_by().to_string(),
            incoming_at: incoming.last_modified_at(),
        });
    }
    Ok(())
}

impl<V: Cacheable> fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("policy", &self.policy)
            .field("max_size", &self.max_size)
            .field("size", &self.size())
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
