//! Backend entry-point: loads settings, prepares PostgreSQL and Redis, then
//! serves the REST API.

mod server;

use std::ffi::OsString;
use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use orderdesk::config::{CacheSettings, DatabaseSettings, ServerSettings};
use orderdesk::inbound::http::health::HealthState;
use orderdesk::outbound::cache::{CacheConfig, RedisListCache};
use orderdesk::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{ServerConfig, create_server};

fn program_args() -> [OsString; 1] {
    [OsString::from("orderdesk")]
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let database = DatabaseSettings::load_from_iter(program_args())
        .map_err(|err| eyre!("failed to load database settings: {err}"))?;
    let cache = CacheSettings::load_from_iter(program_args())
        .map_err(|err| eyre!("failed to load cache settings: {err}"))?;
    let listener = ServerSettings::load_from_iter(program_args())
        .map_err(|err| eyre!("failed to load server settings: {err}"))?;

    let database_url = database.url()?;
    let applied = run_pending_migrations(database_url.as_str())
        .await
        .wrap_err("failed to apply database migrations")?;
    info!(applied, "database schema ready");

    let pool = DbPool::new(
        PoolConfig::new(database_url.as_str()).with_max_size(database.max_connections()),
    )
    .await
    .wrap_err("failed to build database pool")?;

    let list_cache = RedisListCache::connect(CacheConfig::new(cache.url()?.as_str()))
        .await
        .wrap_err("failed to build redis pool")?;

    let bind_addr = listener.bind_addr();
    info!(host = %bind_addr.0, port = bind_addr.1, "starting http server");
    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr, pool, Arc::new(list_cache))
        .with_cache_ttl(cache.ttl());
    create_server(health_state, config)?.await?;
    Ok(())
}
