//! Background Tasks Module
//!
//! Contains maintenance tasks that run periodically alongside a cache.
//!
//! # Tasks
//! - Purge: removes expired entries and evicts down to the size bound

mod purge;

pub use purge::spawn_purge_task;
