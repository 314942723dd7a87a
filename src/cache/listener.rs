//! Invalidation Listener Module
//!
//! Callback consulted when a read finds an entry marked invalid.

use crate::cache::{Cache, Cacheable};

/// Collaborator asked to refresh an entry that was marked invalid.
///
/// The cache calls it once per stale read, synchronously and without holding
/// any of its locks, so the listener may write a fresh entry back through
/// `cache`. The read re-fetches the key only after the call returns. A
/// listener that does nothing leaves the caller with the stale snapshot.
pub trait InvalidationListener<V: Cacheable>: Send + Sync {
    fn entry_invalidated(&self, cache: &Cache<V>, key: &str);
}

impl<V, F> InvalidationListener<V> for F
where
    V: Cacheable,
    F: Fn(&Cache<V>, &str) + Send + Sync,
{
    fn entry_invalidated(&self, cache: &Cache<V>, key: &str) {
        self(cache, key)
    }
}
