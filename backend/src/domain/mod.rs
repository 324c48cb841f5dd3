//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities for the catalogue and order
//! workflow, plus the services that enforce uniqueness, referential and
//! pricing rules before anything reaches storage. Adapters talk to the
//! domain through the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode / FieldErrors: transport-agnostic failures.
//! - Category, Product, Order and their validated value types.
//! - CategoryService, ProductService, OrderService: use cases.
//! - ReadThroughCache: JSON list memoisation over [`ports::ListCache`].

pub mod category;
pub mod category_service;
pub mod error;
pub mod ids;
pub mod list_cache;
pub mod order;
pub mod order_service;
pub mod ports;
pub mod product;
pub mod product_service;
mod validation;

pub use self::category::{Category, CategoryName};
pub use self::category_service::CategoryService;
pub use self::error::{Error, ErrorCode, FieldErrors};
pub use self::ids::{CategoryId, OrderDetailId, OrderId, ProductId};
pub use self::list_cache::{LIST_CACHE_TTL, ReadThroughCache};
pub use self::order::{
    InvoiceNumber, Order, OrderDetail, OrderLine, OrderRequest, PricedLine, PricedOrder, Quantity,
};
pub use self::order_service::OrderService;
pub use self::product::{Price, Product, ProductDraft, ProductName};
pub use self::product_service::ProductService;
pub use self::validation::{MAX_NAME_LENGTH, NameValidationError, PositiveValueError};
