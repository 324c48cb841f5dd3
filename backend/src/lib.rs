//! Order desk backend: categories, products and orders over PostgreSQL with
//! a Redis list cache.
//!
//! The crate follows a ports-and-adapters layout: [`domain`] holds entities,
//! services and port traits; [`inbound`] turns HTTP requests into service
//! calls; [`outbound`] implements the ports with Diesel and Redis.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
