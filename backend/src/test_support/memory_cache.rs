//! In-process list cache with hit counters and failure injection.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ports::{ListCache, ListCacheError, ListCacheKey};

/// `ListCache` kept in a map. Expiry is ignored.
#[derive(Default)]
pub struct InMemoryListCache {
    entries: Mutex<HashMap<ListCacheKey, String>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryListCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail as if the server were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Number of lookups that found nothing.
    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::SeqCst)
    }

    /// Whether a payload is currently stored for `key`.
    pub fn contains(&self, key: ListCacheKey) -> bool {
        self.lock_entries().contains_key(&key)
    }

    fn check_available(&self) -> Result<(), ListCacheError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ListCacheError::backend("cache unavailable"));
        }
        Ok(())
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<ListCacheKey, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ListCache for InMemoryListCache {
    async fn get(&self, key: ListCacheKey) -> Result<Option<String>, ListCacheError> {
        self.check_available()?;
        let payload = self.lock_entries().get(&key).cloned();
        let counter = if payload.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(payload)
    }

    async fn put(
        &self,
        key: ListCacheKey,
        payload: String,
        _ttl: Duration,
    ) -> Result<(), ListCacheError> {
        self.check_available()?;
        self.lock_entries().insert(key, payload);
        Ok(())
    }

    async fn invalidate(&self, keys: &[ListCacheKey]) -> Result<(), ListCacheError> {
        self.check_available()?;
        let mut entries = self.lock_entries();
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}
