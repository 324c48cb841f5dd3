//! Port interface for memoising serialised "list all" payloads.
use std::time::Duration;

use async_trait::async_trait;

use super::{ListCacheKey, define_port_error};

define_port_error! {
    /// Errors surfaced by the list cache adapter.
    pub enum ListCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "list cache backend failure: {message}",
        /// Serialisation or deserialisation of cached content failed.
        Serialization { message: String } => "list cache serialisation failed: {message}",
    }
}

/// Key/value store holding JSON-encoded listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListCache: Send + Sync {
    /// Read the cached payload for `key`, if present and unexpired.
    async fn get(&self, key: ListCacheKey) -> Result<Option<String>, ListCacheError>;

    /// Store `payload` under `key` for `ttl`.
    async fn put(
        &self,
        key: ListCacheKey,
        payload: String,
        ttl: Duration,
    ) -> Result<(), ListCacheError>;

    /// Remove every listed key. Missing keys are not an error.
    async fn invalidate(&self, keys: &[ListCacheKey]) -> Result<(), ListCacheError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn errors_render_context() {
        let err = ListCacheError::backend("connection refused");
        assert_eq!(
            err.to_string(),
            "list cache backend failure: connection refused"
        );
    }
}
