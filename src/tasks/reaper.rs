//! Expiry Reaper
//!
//! Background task that periodically removes expired cache entries, so keys
//! that are never read again do not hold memory until LRU pushes them out.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// The task runs in an infinite loop, sleeping for the interval between
/// sweeps, and goes through the cache's regular lock for each one. Sweeps are
/// independent: a late tick does not trigger catch-up runs.
///
/// # Returns
/// A JoinHandle for the spawned task, used to abort it during shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(Mutex::new(CacheStore::new(1000)));
/// let reaper = spawn_reaper(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// reaper.abort();
/// ```
pub fn spawn_reaper(cache: SharedCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "starting expiry reaper");

        loop {
            tokio::time::sleep(interval).await;

            let (outcome, stats) = {
                let mut cache = cache.lock().await;
                (cache.remove_expired(), cache.stats())
            };

            if outcome.expired > 0 || outcome.evicted > 0 {
                info!(
                    expired = outcome.expired,
                    evicted = outcome.evicted,
                    entries = stats.total_entries,
                    "reaper sweep removed entries"
                );
            } else {
                debug!(
                    entries = stats.total_entries,
                    hit_rate = stats.hit_rate(),
                    "reaper sweep found no expired entries"
                );
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn shared(store: CacheStore) -> SharedCache {
        Arc::new(Mutex::new(store))
    }

    #[tokio::test]
    async fn test_reaper_removes_expired_entries() {
        let cache = shared(CacheStore::new(100));

        cache
            .lock()
            .await
            .set(
                "expire_soon".to_string(),
                "value".to_string(),
                Duration::from_millis(10),
                false,
            )
            .unwrap();

        let handle = spawn_reaper(cache.clone(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(200)).await;

        // Removed by the sweep, not by a lazy GET
        {
            let cache = cache.lock().await;
            assert_eq!(cache.len(), 0, "Expired entry should have been reaped");
            assert_eq!(cache.stats().expirations, 1);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_reaper_preserves_valid_entries() {
        let cache = shared(CacheStore::new(100));

        cache
            .lock()
            .await
            .set(
                "long_lived".to_string(),
                "value".to_string(),
                Duration::from_secs(3600),
                false,
            )
            .unwrap();

        let handle = spawn_reaper(cache.clone(), Duration::from_millis(20));

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(
            cache.lock().await.get("long_lived"),
            Some("value".to_string()),
            "Valid entry should not be removed"
        );

        handle.abort();
    }

    #[tokio::test]
    async fn test_reaper_can_be_aborted() {
        let cache = shared(CacheStore::new(100));

        let handle = spawn_reaper(cache, Duration::from_secs(60));

        handle.abort();

        let result = handle.await;
        assert!(result.is_err_and(|err| err.is_cancelled()));
    }
}
