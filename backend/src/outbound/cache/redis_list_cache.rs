//! Redis-backed list cache using a `bb8-redis` connection pool.
//!
//! Payloads are stored as plain strings with `SET .. EX`, so entries expire
//! on their own even when an invalidation is lost.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection};
use bb8_redis::redis;
use tracing::debug;

use crate::domain::ports::{ListCache, ListCacheError, ListCacheKey};

/// Default time to wait for a pooled Redis connection.
pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for [`RedisListCache`].
#[derive(Debug, Clone)]
pub struct CacheConfig {
    url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl CacheConfig {
    /// Configure a pool for `url` (for example `redis://127.0.0.1:6379`).
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_size: 10,
            connection_timeout: DEFAULT_CACHE_TIMEOUT,
        }
    }

    /// Set the maximum number of pooled connections.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the connection checkout timeout.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}

/// `ListCache` adapter backed by Redis.
#[derive(Clone)]
pub struct RedisListCache {
    pool: Pool<RedisConnectionManager>,
}

impl RedisListCache {
    /// Build the connection pool. Connections are opened on first use.
    ///
    /// # Errors
    ///
    /// Returns `ListCacheError::Backend` when the URL is invalid.
    pub async fn connect(config: CacheConfig) -> Result<Self, ListCacheError> {
        let manager = RedisConnectionManager::new(config.url.as_str())
            .map_err(|err| ListCacheError::backend(format!("invalid redis url: {err}")))?;
        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| ListCacheError::backend(err.to_string()))?;
        Ok(Self { pool })
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, ListCacheError> {
        self.pool
            .get()
            .await
            .map_err(|err| ListCacheError::backend(format!("redis checkout failed: {err}")))
    }
}

fn map_redis_error(error: redis::RedisError) -> ListCacheError {
    ListCacheError::backend(error.to_string())
}

/// Expiry in whole seconds; Redis rejects `EX 0`.
fn expiry_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl ListCache for RedisListCache {
    async fn get(&self, key: ListCacheKey) -> Result<Option<String>, ListCacheError> {
        let mut conn = self.connection().await?;
        let payload: Option<String> = redis::cmd("GET")
            .arg(key.as_str())
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        debug!(%key, hit = payload.is_some(), "list cache lookup");
        Ok(payload)
    }

    async fn put(
        &self,
        key: ListCacheKey,
        payload: String,
        ttl: Duration,
    ) -> Result<(), ListCacheError> {
        let mut conn = self.connection().await?;
        let () = redis::cmd("SET")
            .arg(key.as_str())
            .arg(payload)
            .arg("EX")
            .arg(expiry_seconds(ttl))
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn invalidate(&self, keys: &[ListCacheKey]) -> Result<(), ListCacheError> {
        if keys.is_empty() {
            return Ok(());
        }
        let names: Vec<&'static str> = keys.iter().map(|key| key.as_str()).collect();
        let mut conn = self.connection().await?;
        let removed: i64 = redis::cmd("DEL")
            .arg(&names)
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        debug!(?names, removed, "list cache invalidated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for configuration and expiry handling.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Duration::from_secs(600), 600)]
    #[case(Duration::from_millis(200), 1)]
    #[case(Duration::ZERO, 1)]
    fn expiry_is_at_least_one_second(#[case] ttl: Duration, #[case] expected: u64) {
        assert_eq!(expiry_seconds(ttl), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_url_is_a_backend_error() {
        let result = RedisListCache::connect(CacheConfig::new("not a url")).await;
        assert!(matches!(result, Err(ListCacheError::Backend { .. })));
    }

    #[rstest]
    fn builder_overrides_defaults() {
        let config = CacheConfig::new("redis://127.0.0.1:6379")
            .with_max_size(2)
            .with_connection_timeout(Duration::from_secs(1));
        assert_eq!(config.max_size, 2);
        assert_eq!(config.connection_timeout, Duration::from_secs(1));
    }
}
