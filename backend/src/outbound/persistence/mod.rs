//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of the domain repository
//! ports backed by PostgreSQL via `diesel-async` and `bb8` connection
//! pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Uniqueness and existence rules live in the domain services;
//!   the database constraints back them up under concurrency.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: pool and Diesel failures are classified once
//!   and mapped to each port's error enum.
//!
//! # Example
//!
//! ```ignore
//! use orderdesk::outbound::persistence::{DbPool, DieselCategoryRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/crud_db")).await?;
//! let repo = DieselCategoryRepository::new(pool);
//! ```

mod diesel_category_repository;
mod diesel_error_mapping;
mod diesel_order_repository;
mod diesel_product_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_product_repository::DieselProductRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{
    DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError,
};
