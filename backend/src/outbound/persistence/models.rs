//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use super::schema::{categories, order_details, orders, products};

/// Row struct for reading from the categories table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: i64,
    pub name: String,
}

/// Insertable and changeset struct for category writes.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = categories)]
pub(crate) struct CategoryChanges<'a> {
    pub name: &'a str,
}

/// Row struct for reading from the products table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub category_id: i64,
}

/// Insertable and changeset struct for product writes.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = products)]
pub(crate) struct ProductChanges<'a> {
    pub name: &'a str,
    pub price: Decimal,
    pub category_id: i64,
}

/// Row struct for reading from the orders table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: i64,
    pub invoice_number: Option<String>,
    pub order_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for order headers. Timestamps default in the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow {
    pub order_date: DateTime<Utc>,
    pub total_price: Decimal,
}

/// Row struct for reading from the order_details table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = order_details)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderDetailRow {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub subtotal: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for order lines.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_details)]
pub(crate) struct NewOrderDetailRow {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub subtotal: Decimal,
}
