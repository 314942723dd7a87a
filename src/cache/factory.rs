//! Cache Factory Module
//!
//! Builds empty caches wired to a chosen eviction policy.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{Cache, Cacheable, EvictionPolicy};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::Result;

// == Cache Factory ==
/// Creates caches sharing one size bound and one clock.
///
/// The factory holds no mutable state and can be cloned or shared freely.
///
/// ```
/// use policy_cache::{CacheEntry, CacheFactory, EvictionPolicy};
///
/// let cache = CacheFactory::new(100).create_cache::<String>(EvictionPolicy::Lfu);
/// cache.write(CacheEntry::new("greeting", "hello".to_string())).unwrap();
/// assert_eq!(cache.read("greeting").unwrap().data(), "hello");
/// ```
#[derive(Clone)]
pub struct CacheFactory {
    max_size: usize,
    clock: Arc<dyn Clock>,
}

impl CacheFactory {
    /// Creates a factory for caches bounded to `max_size` entries.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            clock: Arc::new(SystemClock),
        }
    }

    /// Creates a factory from validated configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.max_size))
    }

    /// Time source handed to every cache this factory creates.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    // == Create Cache ==
    /// Returns a fresh, empty cache using `policy`.
    pub fn create_cache<V: Cacheable>(&self, policy: EvictionPolicy) -> Cache<V> {
        debug!(policy = %policy, max_size = self.max_size, "Creating cache");
        Cache::new(self.max_size, policy).with_clock(Arc::clone(&self.clock))
    }

    /// Like `create_cache`, resolving the policy by name. Unknown names
    /// select LRU.
    pub fn create_cache_named<V: Cacheable>(&self, policy: &str) -> Cache<V> {
        self.create_cache(EvictionPolicy::parse(policy))
    }
}

impl fmt::Debug for CacheFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheFactory")
            .field("max_size", &self.max_size)
            .finish_non_exhaustive()
    }
}
