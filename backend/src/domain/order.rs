//! Order aggregate, its line items and invoice numbering.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::PositiveValueError;
use super::{OrderDetailId, OrderId, Product, ProductId};

/// Strictly positive line quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Quantity(i32);

impl Quantity {
    /// Validate that the quantity is at least one.
    pub fn new(value: i32) -> Result<Self, PositiveValueError> {
        if value <= 0 {
            return Err(PositiveValueError::NotPositive { field: "quantity" });
        }
        Ok(Self(value))
    }

    /// Raw quantity.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Quantity {
    type Error = PositiveValueError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i32 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

/// One requested line: a product and how many of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    /// Product being ordered.
    pub product_id: ProductId,
    /// Units requested.
    pub quantity: Quantity,
}

/// Validated order placement request.
///
/// Holds at least one line; the constructor rejects an empty list. The order
/// date is not part of the request because the server clock assigns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    lines: Vec<OrderLine>,
}

impl OrderRequest {
    /// Build a request, rejecting an empty line list.
    pub fn new(lines: Vec<OrderLine>) -> Option<Self> {
        if lines.is_empty() {
            return None;
        }
        Some(Self { lines })
    }

    /// Requested lines in submission order.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }
}

/// A requested line priced against the current product catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    /// Product being ordered.
    pub product_id: ProductId,
    /// Units requested.
    pub quantity: Quantity,
    /// `price × quantity` at order time.
    pub subtotal: Decimal,
}

/// Order header and lines ready to be written in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    /// Date the order was placed.
    pub order_date: DateTime<Utc>,
    /// Sum of every line subtotal.
    pub total_price: Decimal,
    /// Lines in submission order.
    pub lines: Vec<PricedLine>,
}

/// Human-readable invoice identifier, `INV-<YYYYMMDD>-<order id>`.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use orderdesk::domain::{InvoiceNumber, OrderId};
///
/// let placed = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
/// let invoice = InvoiceNumber::for_order(OrderId::new(42), placed);
/// assert_eq!(invoice.to_string(), "INV-20240305-42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
    /// Derive the invoice number from the order id and its placement date.
    pub fn for_order(id: OrderId, order_date: DateTime<Utc>) -> Self {
        Self(format!("INV-{}-{}", order_date.format("%Y%m%d"), id))
    }

    /// Wrap a stored invoice number without re-deriving it.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the invoice number as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for InvoiceNumber {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted order line with the product attached on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetail {
    /// Server-assigned identifier.
    pub id: OrderDetailId,
    /// Owning order.
    pub order_id: OrderId,
    /// Ordered product.
    pub product_id: ProductId,
    /// Units ordered.
    pub quantity: Quantity,
    /// Line subtotal frozen at order time.
    pub subtotal: Decimal,
    /// Current product row, present on reads that join it.
    pub product: Option<Product>,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Persisted order with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Server-assigned identifier.
    pub id: OrderId,
    /// Invoice number; absent only between insert and invoice assignment.
    pub invoice_number: Option<InvoiceNumber>,
    /// Date the order was placed.
    pub order_date: DateTime<Utc>,
    /// Sum of line subtotals.
    pub total_price: Decimal,
    /// Lines in insertion order.
    pub details: Vec<OrderDetail>,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}
