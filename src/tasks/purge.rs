//! Purge Task
//!
//! Background task that periodically purges a shared cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{Cache, Cacheable};

/// Spawns a background task that periodically calls `Cache::purge`.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between runs. `purge` is synchronous and short, so it runs directly on
/// the runtime thread.
///
/// # Arguments
/// * `cache` - shared reference to the cache
/// * `purge_interval_secs` - Interval in seconds between purge runs
///
/// # Returns
/// A JoinHandle for the spawned task, which the owner aborts on shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(CacheFactory::new(1000).create_cache::<String>(EvictionPolicy::Lru));
/// let purge_handle = spawn_purge_task(cache.clone(), 60);
/// // Later, during shutdown:
/// purge_handle.abort();
/// ```
pub fn spawn_purge_task<V: Cacheable>(
    cache: Arc<Cache<V>>,
    purge_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(purge_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting cache purge task with interval of {} seconds",
            purge_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let report = cache.purge();

            if report.total() > 0 {
                info!(
                    "Cache purge: removed {} expired and evicted {} entries",
                    report.expired, report.evicted
                );
            } else {
                debug!("Cache purge: nothing to remove");
            }
        }
    })
}
