//! HTTP server configuration object.

use std::sync::Arc;
use std::time::Duration;

use orderdesk::domain::LIST_CACHE_TTL;
use orderdesk::domain::ports::ListCache;
use orderdesk::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: (String, u16),
    pub(crate) db_pool: DbPool,
    pub(crate) cache: Arc<dyn ListCache>,
    pub(crate) cache_ttl: Duration,
}

impl ServerConfig {
    /// Construct a configuration from the already-connected backends.
    #[must_use]
    pub fn new(bind_addr: (String, u16), db_pool: DbPool, cache: Arc<dyn ListCache>) -> Self {
        Self {
            bind_addr,
            db_pool,
            cache,
            cache_ttl: LIST_CACHE_TTL,
        }
    }

    /// Override the list cache expiry.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}
