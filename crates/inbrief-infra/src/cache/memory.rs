//! In-memory cache implementation - used when Redis is not configured.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use inbrief_core::ports::{Cache, CacheError};

struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// In-memory cache using a HashMap behind an async RwLock.
///
/// Sessions stored here are lost on restart and are not shared between
/// instances.
pub struct InMemoryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    /// Drop every expired entry. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut store = self.store.write().await;
        let before = store.len();
        store.retain(|_, entry| !entry.is_expired(now));
        before - store.len()
    }

    /// Purge expired entries every `every` until the cache is dropped.
    pub fn spawn_purge_task(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let cache = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };

                let purged = cache.purge_expired().await;
                if purged > 0 {
                    tracing::debug!(purged, "Purged expired cache entries");
                }
            }
        })
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let store = self.store.read().await;
        let entry = store.get(key)?;

        if entry.is_expired(now) {
            drop(store);
            self.store.write().await.remove(key);
            return None;
        }

        Some(entry.value.clone())
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let expires_at = ttl.map(|d| Instant::now() + d);

        self.store.write().await.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.write().await.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> bool {
        self.get(key).await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();
        cache.set("session:1", "alice", None).await.unwrap();
        assert_eq!(cache.get("session:1").await, Some("alice".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = InMemoryCache::new();
        cache.set("session:1", "alice", None).await.unwrap();
        cache.delete("session:1").await.unwrap();
        assert!(!cache.exists("session:1").await);
    }

    #[tokio::test]
    async fn test_entry_expires() {
        let cache = InMemoryCache::new();
        cache
            .set("session:1", "alice", Some(Duration::from_millis(20)))
            .await
            .unwrap();
        cache.set("session:2", "bob", None).await.unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(cache.get("session:1").await, None);
        assert_eq!(cache.purge_expired().await, 0);
        assert!(cache.exists("session:2").await);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let cache = InMemoryCache::new();
        cache
            .set("session:1", "alice", Some(Duration::ZERO))
            .await
            .unwrap();
        cache.set("session:2", "bob", None).await.unwrap();

        assert_eq!(cache.purge_expired().await, 1);
        assert!(cache.exists("session:2").await);
    }

    #[tokio::test]
    async fn test_purge_task_evicts_unread_entries() {
        let cache = Arc::new(InMemoryCache::new());
        cache
            .set("session:1", "alice", Some(Duration::from_millis(10)))
            .await
            .unwrap();
        cache.set("session:2", "bob", None).await.unwrap();

        let task = cache.spawn_purge_task(Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.store.read().await.len(), 1);

        drop(cache);
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("purge task stops once the cache is dropped")
            .unwrap();
    }
}
