//! Runtime settings loaded via OrthoConfig.
//!
//! Each group reads prefixed environment variables (`DB_*`, `REDIS_*`,
//! `SERVER_*`). Every value is optional in the environment; accessors fall
//! back to defaults suitable for a local development stack.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::LIST_CACHE_TTL;
use crate::outbound::persistence::DEFAULT_MAX_CONNECTIONS;

const DEFAULT_DB_HOST: &str = "127.0.0.1";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_NAME: &str = "crud_db";
const DEFAULT_REDIS_HOST: &str = "127.0.0.1:6379";
const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 8080;

/// Failure to turn settings into a connection URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// A component could not be placed into the URL.
    #[error("invalid {component} in {target} settings")]
    InvalidComponent {
        /// Which settings group.
        target: &'static str,
        /// Offending URL component.
        component: &'static str,
    },
}

fn invalid(target: &'static str, component: &'static str) -> SettingsError {
    SettingsError::InvalidComponent { target, component }
}

/// PostgreSQL connection settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DB")]
pub struct DatabaseSettings {
    /// Server host name or address.
    pub host: Option<String>,
    /// Server port.
    pub port: Option<u16>,
    /// Login role.
    pub user: Option<String>,
    /// Login password; empty when unset.
    pub password: Option<String>,
    /// Database name.
    pub name: Option<String>,
    /// Upper bound on pooled connections.
    pub max_connections: Option<u32>,
}

impl DatabaseSettings {
    /// Assemble the connection URL, escaping credentials.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the host cannot be represented in a URL.
    pub fn url(&self) -> Result<Url, SettingsError> {
        let mut url = Url::parse("postgres://localhost").map_err(|_| invalid("db", "scheme"))?;
        url.set_host(Some(self.host.as_deref().unwrap_or(DEFAULT_DB_HOST)))
            .map_err(|_| invalid("db", "host"))?;
        url.set_port(Some(self.port.unwrap_or(DEFAULT_DB_PORT)))
            .map_err(|()| invalid("db", "port"))?;
        url.set_username(self.user.as_deref().unwrap_or(DEFAULT_DB_USER))
            .map_err(|()| invalid("db", "user"))?;
        let password = self.password.as_deref().filter(|value| !value.is_empty());
        url.set_password(password)
            .map_err(|()| invalid("db", "password"))?;
        url.set_path(self.name.as_deref().unwrap_or(DEFAULT_DB_NAME));
        Ok(url)
    }

    /// Configured pool size.
    pub fn max_connections(&self) -> u32 {
        self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }
}

/// Redis connection and list cache settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REDIS")]
pub struct CacheSettings {
    /// `host:port` of the Redis server.
    pub host: Option<String>,
    /// `AUTH` password, when the server requires one.
    pub password: Option<String>,
    /// Expiry of cached list payloads, in seconds.
    pub ttl_seconds: Option<u64>,
}

impl CacheSettings {
    /// Assemble the `redis://` URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the host is not a valid `host:port`.
    pub fn url(&self) -> Result<Url, SettingsError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_REDIS_HOST);
        let mut url =
            Url::parse(&format!("redis://{host}")).map_err(|_| invalid("redis", "host"))?;
        if let Some(password) = self.password.as_deref().filter(|value| !value.is_empty()) {
            url.set_password(Some(password))
                .map_err(|()| invalid("redis", "password"))?;
        }
        Ok(url)
    }

    /// Expiry applied to cached listings.
    pub fn ttl(&self) -> Duration {
        self.ttl_seconds
            .map(Duration::from_secs)
            .unwrap_or(LIST_CACHE_TTL)
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SERVER")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
}

impl ServerSettings {
    /// Address tuple accepted by `HttpServer::bind`.
    pub fn bind_addr(&self) -> (String, u16) {
        (
            self.host
                .clone()
                .unwrap_or_else(|| DEFAULT_SERVER_HOST.to_owned()),
            self.port.unwrap_or(DEFAULT_SERVER_PORT),
        )
    }
}
