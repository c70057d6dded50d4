//! Expiry Sweep Task
//!
//! Background task that periodically evicts expired cache entries.
//! Expiration is otherwise lazy (checked on `get`); the sweep keeps memory
//! from accumulating entries nobody asks for again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically evicts expired cache entries.
///
/// The task loops forever, sleeping for the given interval between sweeps.
/// It acquires a write lock on the cache for each sweep.
///
/// # Arguments
/// * `cache` - Shared reference to the cache
/// * `interval_secs` - Seconds between sweeps
///
/// # Returns
/// A JoinHandle used to abort the task during graceful shutdown.
pub fn spawn_sweep_task(cache: Arc<RwLock<CacheStore>>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!("starting expiry sweep task, interval {}s", interval_secs);

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache = cache.write().await;
                cache.evict_expired()
            };

            if removed > 0 {
                info!("expiry sweep removed {} entries", removed);
            } else {
                debug!("expiry sweep found nothing to remove");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_sweep_removes_expired_entries() {
        let cache = Arc::new(RwLock::new(CacheStore::new(1024 * 1024, 300_000)));

        {
            let mut cache = cache.write().await;
            cache.set("short".to_string(), json!("v"), Some(100));
            cache.set("long".to_string(), json!("v"), Some(60_000));
        }

        let handle = spawn_sweep_task(cache.clone(), 1);

        tokio::time::sleep(Duration::from_millis(2500)).await;

        {
            let cache = cache.read().await;
            assert_eq!(cache.len(), 1, "expired entry should have been swept");
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_preserves_live_entries() {
        let cache = Arc::new(RwLock::new(CacheStore::new(1024 * 1024, 300_000)));

        {
            let mut cache = cache.write().await;
            cache.set("live".to_string(), json!("v"), Some(3_600_000));
        }

        let handle = spawn_sweep_task(cache.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        {
            let mut cache = cache.write().await;
            assert_eq!(cache.get("live"), Some(json!("v")));
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let cache = Arc::new(RwLock::new(CacheStore::new(1024, 1000)));

        let handle = spawn_sweep_task(cache, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "task should be finished after abort");
    }
}
