//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data`. The services
//! hold their repositories behind trait objects, so tests build the same
//! state over in-memory adapters.

use crate::domain::{CategoryService, OrderService, ProductService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub categories: CategoryService,
    pub products: ProductService,
    pub orders: OrderService,
}

impl HttpState {
    /// Bundle the three use-case services.
    pub fn new(
        categories: CategoryService,
        products: ProductService,
        orders: OrderService,
    ) -> Self {
        Self {
            categories,
            products,
            orders,
        }
    }
}
