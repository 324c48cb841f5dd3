//! Port for order persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{InvoiceNumber, Order, OrderId, PricedOrder};

use super::define_port_error;

define_port_error! {
    /// Errors raised by order repository adapters.
    pub enum OrderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "order repository query failed: {message}",
        /// A detail references a product that no longer exists.
        MissingProduct =>
            "order detail references a missing product",
        /// No order has the given id.
        NotFound { order_id: i64 } =>
            "order {order_id} not found",
    }
}

/// Port for the order aggregate.
///
/// Reads return details in insertion order with product and category
/// attached.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist the header and every line in one transaction.
    async fn create_order_with_details(
        &self,
        order: &PricedOrder,
    ) -> Result<Order, OrderRepositoryError>;

    /// Set the invoice number on an existing order, returning the row's new
    /// `updated_at`.
    async fn update_order_invoice(
        &self,
        id: OrderId,
        invoice: &InvoiceNumber,
    ) -> Result<DateTime<Utc>, OrderRepositoryError>;

    /// Read every order ordered by id.
    async fn list_all(&self) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Find an order by id.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, OrderRepositoryError>;

    /// Delete an order and its details; `false` when no row has that id.
    async fn delete(&self, id: OrderId) -> Result<bool, OrderRepositoryError>;
}
