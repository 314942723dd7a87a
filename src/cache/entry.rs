//! Cache Entry Module
//!
//! Defines individual cache entries, the `Cacheable` payload contract and the
//! optional `Auditable` capability.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

// == Auditable ==
/// Change-auditing metadata a payload may expose.
///
/// When both the stored and the incoming payload for a key are auditable,
/// `Cache::write` refuses the write unless their metadata agree.
pub trait Auditable {
    /// Who last modified the value.
    fn last_modified_by(&self) -> &str;
    /// When the value was last modified.
    fn last_modified_at(&self) -> DateTime<Utc>;
}

// == Cacheable ==
/// Contract every cached payload fulfils.
pub trait Cacheable: Clone + Send + Sync + 'static {
    /// Structural validity of the payload itself.
    ///
    /// An entry is only valid when both this and its own flag hold.
    fn is_valid(&self) -> bool {
        true
    }

    /// Capability query for change-auditing metadata.
    fn as_auditable(&self) -> Option<&dyn Auditable> {
        None
    }
}

macro_rules! plain_cacheable {
    ($($ty:ty),* $(,)?) => {
        $(impl Cacheable for $ty {})*
    };
}

plain_cacheable!(
    String, &'static str, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128,
    usize, f32, f64,
);

impl<T: Clone + Send + Sync + 'static> Cacheable for Vec<T> {}

impl<K, V> Cacheable for HashMap<K, V>
where
    K: Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
}

impl<K, V> Cacheable for BTreeMap<K, V>
where
    K: Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
}

impl<T: Cacheable> Cacheable for Option<T> {
    fn is_valid(&self) -> bool {
        self.as_ref().map_or(true, |value| value.is_valid())
    }

    fn as_auditable(&self) -> Option<&dyn Auditable> {
        self.as_ref().and_then(|value| value.as_auditable())
    }
}

impl<T: Cacheable> Cacheable for Box<T> {
    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }

    fn as_auditable(&self) -> Option<&dyn Auditable> {
        (**self).as_auditable()
    }
}

impl<T: Cacheable> Cacheable for Arc<T> {
    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }

    fn as_auditable(&self) -> Option<&dyn Auditable> {
        (**self).as_auditable()
    }
}

// == Cache Entry ==
/// A single cache entry with its payload and metadata.
///
/// Usage metadata (`frequency`, `last_access`) has no public setter; it is
/// reset or carried forward by `Cache::write` and advanced by `Cache::read`.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    key: String,
    data: V,
    created_at: DateTime<Utc>,
    /// None = no expiration
    expires_at: Option<DateTime<Utc>>,
    valid: bool,
    /// LFU hit counter
    pub(crate) frequency: u64,
    /// LRU access stamp
    pub(crate) last_access: DateTime<Utc>,
}

impl<V: Cacheable> CacheEntry<V> {
    // == Constructor ==
    /// Creates a valid, never-expiring entry.
    pub fn new(key: impl Into<String>, data: V) -> Self {
        Self::created_at(key, data, Utc::now())
    }

    /// Creates an entry with an explicit creation time.
    pub fn created_at(key: impl Into<String>, data: V, created_at: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            data,
            created_at,
            expires_at: None,
            valid: true,
            frequency: 0,
            last_access: created_at,
        }
    }

    /// Sets an absolute expiration time.
    pub fn with_expiration(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }

    /// Sets the expiration relative to the entry's creation time.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.expires_at = Some(self.created_at + ttl);
        self
    }

    // == Accessors ==
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the payload. Reading it is not a cache hit.
    pub fn data(&self) -> &V {
        &self.data
    }

    pub fn into_data(self) -> V {
        self.data
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn set_expires_at(&mut self, at: Option<DateTime<Utc>>) {
        self.expires_at = at;
    }

    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    pub fn last_access(&self) -> DateTime<Utc> {
        self.last_access
    }

    // == Is Expired ==
    /// Checks whether the entry expired before `now`.
    ///
    /// An entry expiring exactly at `now` is still live.
    pub fn has_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(at) if at < now)
    }

    /// Checks expiration against the system clock.
    ///
    /// A `Cache` judges expiry with its own injected `Clock` instead, so under
    /// a `ManualClock` the two can disagree; prefer `has_expired_at`.
    pub fn has_expired(&self) -> bool {
        self.has_expired_at(Utc::now())
    }

    // == Validity ==
    /// True when both the entry flag and the payload's own validity hold.
    pub fn is_valid(&self) -> bool {
        self.valid && self.data.is_valid()
    }

    /// Administrative override of the validity flag.
    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    // == Usage Metadata ==
    /// Resets usage as if the entry was first seen at `now`.
    pub(crate) fn reset_usage(&mut self, now: DateTime<Utc>) {
        self.frequency = 0;
        self.last_access = now;
    }

    /// Copies usage metadata from the entry this one replaces.
    pub(crate) fn inherit_usage(&mut self, previous: &CacheEntry<V>) {
        self.frequency = previous.frequency;
        self.last_access = previous.last_access;
    }
}
