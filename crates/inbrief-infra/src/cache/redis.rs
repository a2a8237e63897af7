//! Redis cache implementation, shared by every API instance.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use inbrief_core::ports::{Cache, CacheError};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Prefix added to every key so several apps can share one Redis
    pub key_prefix: String,
    /// Whether to fall back to the in-memory cache if Redis is unavailable
    pub fallback_to_memory: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            key_prefix: "inbrief:".to_string(),
            fallback_to_memory: true,
        }
    }
}

impl RedisConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` when `REDIS_URL` is not set.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("REDIS_URL").ok()?;
        let defaults = Self::default();

        Some(Self {
            url,
            connect_timeout: std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            key_prefix: std::env::var("REDIS_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            fallback_to_memory: std::env::var("REDIS_FALLBACK_TO_MEMORY")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.fallback_to_memory),
        })
    }
}

/// Redis-backed cache implementation.
///
/// Uses a connection manager for automatic reconnection.
pub struct RedisCache {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisCache {
    pub async fn new(config: &RedisConfig) -> Result<Self, CacheError> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| CacheError::Connection(e.to_string()))?;

        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Connection("Connection timed out".to_string()))?
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        tracing::info!("Connected to Redis session cache");

        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(self.key(key)).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Redis GET failed");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let key = self.key(key);

        match ttl {
            // SETEX rejects a zero expiry
            Some(duration) => conn
                .set_ex::<_, _, ()>(key, value, duration.as_secs().max(1))
                .await
                .map_err(|e| CacheError::Operation(e.to_string())),
            None => conn
                .set::<_, _, ()>(key, value)
                .await
                .map_err(|e| CacheError::Operation(e.to_string())),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.key(key))
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))
    }

    async fn exists(&self, key: &str) -> bool {
        let mut conn = self.conn.clone();
        conn.exists::<_, bool>(self.key(key)).await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn get_test_cache() -> Option<RedisCache> {
        let config = RedisConfig {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6389".to_string()),
            connect_timeout: Duration::from_secs(1),
            key_prefix: "inbrief-test:".to_string(),
            fallback_to_memory: false,
        };

        RedisCache::new(&config).await.ok()
    }

    #[tokio::test]
    async fn test_redis_session_roundtrip() {
        let Some(cache) = get_test_cache().await else {
            tracing::warn!("Redis not available, skipping test");
            return;
        };

        cache
            .set("session:test", "{\"employee_id\":\"1\"}", Some(Duration::from_secs(60)))
            .await
            .unwrap();
        assert!(cache.exists("session:test").await);

        cache.delete("session:test").await.unwrap();
        assert_eq!(cache.get("session:test").await, None);
    }

    #[test]
    fn test_default_prefix() {
        assert_eq!(RedisConfig::default().key_prefix, "inbrief:");
    }
}
