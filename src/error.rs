//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use chrono::{DateTime, Utc};
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// A missing or expired key is not an error: `Cache::read` returns `None`
/// for both and leaves the recovery decision to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Entry carries no key and cannot be stored
    #[error("Cannot store entry without a key")]
    MissingKey,

    /// Entry reports itself invalid and cannot be stored
    #[error("Cannot store invalid entry: {0}")]
    InvalidEntry(String),

    /// Audit metadata of the incoming entry disagrees with the stored one
    #[error(
        "Concurrent modification of {key}: stored by {stored_by} at {stored_at}, \
         incoming by {incoming_by} at {incoming_at}"
    )]
    ConcurrentModification {
        key: String,
        stored_by: String,
        stored_at: DateTime<Utc>,
        incoming_by: String,
        incoming_at: DateTime<Utc>,
    },

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CacheError {
    /// Returns true for optimistic-concurrency conflicts, which callers
    /// resolve by re-reading and retrying.
    pub fn is_conflict(&self) -> bool {
        matches!(self, CacheError::ConcurrentModification { .. })
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
