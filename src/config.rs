//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;

use serde::{Deserialize, Serialize};

use crate::cache::EvictionPolicy;
use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upper bound on entry count, enforced by purge
    pub max_size: usize,
    /// Eviction policy for new caches
    pub policy: EvictionPolicy,
    /// Periodic purge interval in seconds
    pub purge_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Maximum cache entries (default: 1000)
    /// - `CACHE_POLICY` - `lfu` or `lru`, anything else means `lru` (default: lru)
    /// - `CACHE_PURGE_INTERVAL` - Purge frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_size: env::var("CACHE_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_size),
            policy: env::var("CACHE_POLICY")
                .map(|v| EvictionPolicy::parse(&v))
                .unwrap_or(defaults.policy),
            purge_interval: env::var("CACHE_PURGE_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.purge_interval),
        }
    }

    /// Checks that every value is in range.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "max_size must be positive".to_string(),
            ));
        }
        if self.purge_interval == 0 {
            return Err(CacheError::InvalidConfig(
                "purge_interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_size: 1000,
            policy: EvictionPolicy::Lru,
            purge_interval: 60,
        }
    }
}
