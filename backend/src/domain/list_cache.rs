//! Read-through memoisation of "list all" queries.
//!
//! The cache is an optimisation only: every failure is logged at `warn` and
//! the caller falls back to storage, so a broken cache never fails a request.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::ports::{ListCache, ListCacheError, ListCacheKey};

/// Expiry applied to cached listings unless configured otherwise.
pub const LIST_CACHE_TTL: Duration = Duration::from_secs(600);

/// Wraps a [`ListCache`] with JSON encoding and failure swallowing.
#[derive(Clone)]
pub struct ReadThroughCache {
    cache: Arc<dyn ListCache>,
    ttl: Duration,
}

impl ReadThroughCache {
    /// Use `cache` with the default [`LIST_CACHE_TTL`].
    pub fn new(cache: Arc<dyn ListCache>) -> Self {
        Self::with_ttl(cache, LIST_CACHE_TTL)
    }

    /// Use `cache` with an explicit expiry.
    pub fn with_ttl(cache: Arc<dyn ListCache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Return the cached listing for `key`, or run `fetch` and cache its
    /// result.
    pub async fn load<T, E, F, Fut>(&self, key: ListCacheKey, fetch: F) -> Result<Vec<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        if let Some(hit) = self.read(key).await {
            return Ok(hit);
        }

        let rows = fetch().await?;
        self.write(key, &rows).await;
        Ok(rows)
    }

    /// Drop every listing affected by a write to `written`.
    async fn invalidate(&self, written: ListCacheKey) {
        let keys = written.affected_by_write();
        if let Err(error) = self.cache.invalidate(keys).await {
            warn!(key = %written, %error, "list cache invalidation failed");
        }
    }

    /// Run `write` between two invalidations of every listing `written`
    /// affects. A listing cached while the write is in flight is dropped by
    /// the second pass. Both passes run whether or not the write succeeds.
    pub async fn around_write<T, E, Fut>(&self, written: ListCacheKey, write: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        self.invalidate(written).await;
        let outcome = write.await;
        self.invalidate(written).await;
        outcome
    }

    async fn read<T: DeserializeOwned>(&self, key: ListCacheKey) -> Option<Vec<T>> {
        let payload = match self.cache.get(key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(error) => {
                warn!(%key, %error, "list cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(rows) => Some(rows),
            Err(err) => {
                let error = ListCacheError::serialization(err.to_string());
                warn!(%key, %error, "discarding undecodable list cache entry");
                None
            }
        }
    }

    async fn write<T: Serialize>(&self, key: ListCacheKey, rows: &[T]) {
        let payload = match serde_json::to_string(rows) {
            Ok(payload) => payload,
            Err(err) => {
                let error = ListCacheError::serialization(err.to_string());
                warn!(%key, %error, "list cache encode failed");
                return;
            }
        };

        if let Err(error) = self.cache.put(key, payload, self.ttl).await {
            warn!(%key, %error, "list cache write failed");
        }
    }
}
