//! Wire Diesel repositories and the list cache into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use orderdesk::domain::{CategoryService, OrderService, ProductService, ReadThroughCache};
use orderdesk::inbound::http::state::HttpState;
use orderdesk::outbound::persistence::{
    DieselCategoryRepository, DieselOrderRepository, DieselProductRepository,
};

use super::ServerConfig;

/// Build the shared handler state. Every service shares one pool and one
/// cache client.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let cache = ReadThroughCache::with_ttl(config.cache.clone(), config.cache_ttl);
    let categories = Arc::new(DieselCategoryRepository::new(config.db_pool.clone()));
    let products = Arc::new(DieselProductRepository::new(config.db_pool.clone()));
    let orders = Arc::new(DieselOrderRepository::new(config.db_pool.clone()));

    web::Data::new(HttpState::new(
        CategoryService::new(categories.clone(), cache.clone()),
        ProductService::new(products.clone(), categories, cache.clone()),
        OrderService::new(orders, products, cache, Arc::new(DefaultClock)),
    ))
}
