//! Order placement workflow.
//!
//! Placing an order prices every line against the current catalogue, writes
//! the header and lines in one transaction, then stamps the invoice number in
//! a follow-up update. A failure in that last step leaves a committed order
//! without an invoice; it is reported to the caller and logged, never retried.

use std::sync::Arc;

use mockable::Clock;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::ports::{
    ListCacheKey, OrderRepository, OrderRepositoryError, ProductRepository,
    ProductRepositoryError,
};
use crate::domain::{
    Error, InvoiceNumber, Order, OrderId, OrderRequest, PricedLine, PricedOrder, Product,
    ReadThroughCache,
};

const NOT_FOUND: &str = "Order not found";

fn map_repository_error(error: OrderRepositoryError) -> Error {
    match error {
        OrderRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("order repository unavailable: {message}"))
        }
        OrderRepositoryError::Query { message } => {
            Error::internal(format!("order repository error: {message}"))
        }
        OrderRepositoryError::MissingProduct => Error::not_found("Product not found"),
        OrderRepositoryError::NotFound { order_id } => {
            Error::not_found(format!("order {order_id} not found"))
        }
    }
}

fn map_product_error(error: ProductRepositoryError) -> Error {
    match error {
        ProductRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("product repository unavailable: {message}"))
        }
        other => Error::internal(format!("product repository error: {other}")),
    }
}

fn total_overflow() -> Error {
    Error::invalid_request("order total exceeds the supported range")
}

/// Order service coordinating products, orders and the list cache.
#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductRepository>,
    cache: ReadThroughCache,
    clock: Arc<dyn Clock>,
}

impl OrderService {
    /// Create a service over the given repositories, cache and clock.
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        products: Arc<dyn ProductRepository>,
        cache: ReadThroughCache,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            orders,
            products,
            cache,
            clock,
        }
    }

    /// Place an order and assign its invoice number.
    ///
    /// Returns the persisted order with each line's product attached.
    pub async fn create(&self, request: OrderRequest) -> Result<Order, Error> {
        let (priced, products) = self.price(&request).await?;

        let mut order = self
            .cache
            .around_write(ListCacheKey::Orders, self.persist(&priced))
            .await?;

        for (detail, product) in order.details.iter_mut().zip(products) {
            detail.product = Some(product);
        }
        info!(
            order_id = %order.id,
            total_price = %order.total_price,
            lines = order.details.len(),
            "order created"
        );
        Ok(order)
    }

    /// Every order with details, served from the cache when warm.
    pub async fn list(&self) -> Result<Vec<Order>, Error> {
        self.cache
            .load(ListCacheKey::Orders, || async {
                self.orders.list_all().await.map_err(map_repository_error)
            })
            .await
    }

    /// A single order with details.
    pub async fn get(&self, id: OrderId) -> Result<Order, Error> {
        self.orders
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    /// Delete an order together with its details.
    pub async fn delete(&self, id: OrderId) -> Result<(), Error> {
        let deleted = self
            .cache
            .around_write(ListCacheKey::Orders, async {
                self.orders.delete(id).await.map_err(map_repository_error)
            })
            .await?;
        if !deleted {
            return Err(Error::not_found(NOT_FOUND));
        }
        Ok(())
    }

    /// Commit the order, then stamp its invoice number in a separate update.
    async fn persist(&self, priced: &PricedOrder) -> Result<Order, Error> {
        let mut order = self
            .orders
            .create_order_with_details(priced)
            .await
            .map_err(map_repository_error)?;

        let invoice = InvoiceNumber::for_order(order.id, order.order_date);
        order.updated_at = self
            .orders
            .update_order_invoice(order.id, &invoice)
            .await
            .map_err(|error| {
                warn!(order_id = %order.id, %error, "order persisted without invoice number");
                map_repository_error(error)
            })?;
        order.invoice_number = Some(invoice);
        Ok(order)
    }

    /// Price every line in submission order. Nothing is written here, so a
    /// missing product aborts the placement before any state changes.
    async fn price(&self, request: &OrderRequest) -> Result<(PricedOrder, Vec<Product>), Error> {
        let mut lines = Vec::with_capacity(request.lines().len());
        let mut products = Vec::with_capacity(request.lines().len());
        let mut total = Decimal::ZERO;

        for line in request.lines() {
            let product = self
                .products
                .find_by_id(line.product_id)
                .await
                .map_err(map_product_error)?
                .ok_or_else(|| Error::not_found(format!("product {} not found", line.product_id)))?;
            let subtotal = product
                .price
                .line_total(line.quantity)
                .ok_or_else(total_overflow)?;
            total = total.checked_add(subtotal).ok_or_else(total_overflow)?;
            lines.push(PricedLine {
                product_id: line.product_id,
                quantity: line.quantity,
                subtotal,
            });
            products.push(product);
        }

        let priced = PricedOrder {
            order_date: self.clock.utc(),
            total_price: total,
            lines,
        };
        Ok((priced, products))
    }
}

#[cfg(test)]
#[path = "order_service_tests.rs"]
mod tests;
