//! Policy Cache - a bounded in-memory cache
//!
//! Provides a key-value cache with expiration, validity tracking and
//! pluggable LFU/LRU eviction, plus a factory and a periodic purge task.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{
    Auditable, Cache, CacheEntry, CacheFactory, CacheStats, Cacheable, EntryView, EvictionPolicy,
    InvalidationListener, PurgeReport,
};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_purge_task;
