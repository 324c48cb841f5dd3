//! Product entity and its validated inputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::{NameValidationError, PositiveValueError, normalise_name};
use super::{Category, CategoryId, ProductId, Quantity};

/// Validated product name. Unique only within a category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductName(String);

impl ProductName {
    /// Validate and construct a product name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, NameValidationError> {
        normalise_name(raw.as_ref()).map(Self)
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for ProductName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ProductName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProductName {
    type Error = NameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductName> for String {
    fn from(value: ProductName) -> Self {
        value.0
    }
}

/// Strictly positive unit price.
///
/// # Examples
/// ```
/// use orderdesk::domain::{Price, Quantity};
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(150_000, 2)).expect("positive");
/// let quantity = Quantity::new(2).expect("positive");
/// assert_eq!(price.line_total(quantity), Some(Decimal::new(300_000, 2)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Validate that the amount is greater than zero.
    pub fn new(amount: Decimal) -> Result<Self, PositiveValueError> {
        if amount <= Decimal::ZERO {
            return Err(PositiveValueError::NotPositive { field: "price" });
        }
        Ok(Self(amount))
    }

    /// Underlying decimal amount.
    pub fn amount(self) -> Decimal {
        self.0
    }

    /// `price × quantity`, or `None` when the product overflows.
    pub fn line_total(self, quantity: Quantity) -> Option<Decimal> {
        self.0.checked_mul(Decimal::from(quantity.get()))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PositiveValueError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(value: Price) -> Self {
        value.0
    }
}

/// Validated product fields used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    /// Product name.
    pub name: ProductName,
    /// Unit price.
    pub price: Price,
    /// Owning category.
    pub category_id: CategoryId,
}

/// Persisted product with its category attached on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned identifier.
    pub id: ProductId,
    /// Product name.
    pub name: ProductName,
    /// Current unit price.
    pub price: Price,
    /// Owning category id.
    pub category_id: CategoryId,
    /// Denormalised category, present on reads that join it.
    pub category: Option<Category>,
}
