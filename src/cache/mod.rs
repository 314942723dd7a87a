//! Cache Module
//!
//! Provides a bounded in-memory cache with expiration, invalidation and
//! LFU/LRU eviction.

mod entry;
mod factory;
mod listener;
mod policy;
mod stats;
mod store;
mod view;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{Auditable, CacheEntry, Cacheable};
pub use factory::CacheFactory;
pub use listener::InvalidationListener;
pub use policy::EvictionPolicy;
pub use stats::CacheStats;
pub use store::{Cache, PurgeReport};
pub use view::EntryView;
