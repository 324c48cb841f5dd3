//! PostgreSQL-backed `OrderRepository` implementation using Diesel ORM.
//!
//! Order placement writes the header and every line inside one
//! read-committed transaction. Lines are inserted one at a time so their ids
//! follow submission order, which reads rely on to return details in the
//! order they were placed.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{OrderRepository, OrderRepositoryError};
use crate::domain::{
    InvoiceNumber, Order, OrderDetail, OrderDetailId, OrderId, PricedOrder, ProductId, Quantity,
};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::diesel_product_repository::row_to_product;
use super::models::{
    CategoryRow, NewOrderDetailRow, NewOrderRow, OrderDetailRow, OrderRow, ProductRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{categories, order_details, orders, products};

type DetailRows = (OrderDetailRow, ProductRow, CategoryRow);

/// Diesel-backed implementation of the order repository port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OrderRepositoryError {
    OrderRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> OrderRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => OrderRepositoryError::connection(message),
        StoreFailure::Query(message) => OrderRepositoryError::query(message),
        StoreFailure::ForeignKeyViolation => OrderRepositoryError::missing_product(),
        StoreFailure::UniqueViolation => OrderRepositoryError::query("unique violation"),
    }
}

fn invalid_row(id: i64, err: impl std::fmt::Display) -> OrderRepositoryError {
    OrderRepositoryError::query(format!("stored order {id}: {err}"))
}

fn row_to_detail(
    row: OrderDetailRow,
    product: Option<(ProductRow, CategoryRow)>,
) -> Result<OrderDetail, OrderRepositoryError> {
    let quantity = Quantity::new(row.quantity).map_err(|err| invalid_row(row.order_id, err))?;
    let product = product
        .map(|(product, category)| row_to_product(product, category))
        .transpose()
        .map_err(|err| invalid_row(row.order_id, err))?;

    Ok(OrderDetail {
        id: OrderDetailId::new(row.id),
        order_id: OrderId::new(row.order_id),
        product_id: ProductId::new(row.product_id),
        quantity,
        subtotal: row.subtotal,
        product,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn row_to_order(row: OrderRow, details: Vec<OrderDetail>) -> Order {
    Order {
        id: OrderId::new(row.id),
        invoice_number: row.invoice_number.map(InvoiceNumber::from_stored),
        order_date: row.order_date,
        total_price: row.total_price,
        details,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// Attach detail rows (already in id order) to their order headers.
fn assemble_orders(
    headers: Vec<OrderRow>,
    detail_rows: Vec<DetailRows>,
) -> Result<Vec<Order>, OrderRepositoryError> {
    let mut grouped: HashMap<i64, Vec<OrderDetail>> = HashMap::new();
    for (detail, product, category) in detail_rows {
        let order_id = detail.order_id;
        let detail = row_to_detail(detail, Some((product, category)))?;
        grouped.entry(order_id).or_default().push(detail);
    }

    Ok(headers
        .into_iter()
        .map(|header| {
            let details = grouped.remove(&header.id).unwrap_or_default();
            row_to_order(header, details)
        })
        .collect())
}

async fn load_details(
    conn: &mut AsyncPgConnection,
    order_ids: &[i64],
) -> Result<Vec<DetailRows>, OrderRepositoryError> {
    if order_ids.is_empty() {
        return Ok(Vec::new());
    }

    order_details::table
        .inner_join(products::table.inner_join(categories::table))
        .filter(order_details::order_id.eq_any(order_ids.to_vec()))
        .order(order_details::id.asc())
        .select((
            OrderDetailRow::as_select(),
            ProductRow::as_select(),
            CategoryRow::as_select(),
        ))
        .load(conn)
        .await
        .map_err(map_diesel_error)
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn create_order_with_details(
        &self,
        order: &PricedOrder,
    ) -> Result<Order, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let header = NewOrderRow {
            order_date: order.order_date,
            total_price: order.total_price,
        };
        let lines = order.lines.clone();

        let (header, detail_rows) = conn
            .build_transaction()
            .read_committed()
            .run(|conn| {
                async move {
                    let header: OrderRow = diesel::insert_into(orders::table)
                        .values(&header)
                        .returning(OrderRow::as_returning())
                        .get_result(conn)
                        .await?;

                    let mut detail_rows = Vec::with_capacity(lines.len());
                    for line in lines {
                        let row: OrderDetailRow = diesel::insert_into(order_details::table)
                            .values(NewOrderDetailRow {
                                order_id: header.id,
                                product_id: line.product_id.get(),
                                quantity: line.quantity.get(),
                                subtotal: line.subtotal,
                            })
                            .returning(OrderDetailRow::as_returning())
                            .get_result(conn)
                            .await?;
                        detail_rows.push(row);
                    }

                    Ok::<_, diesel::result::Error>((header, detail_rows))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let details = detail_rows
            .into_iter()
            .map(|row| row_to_detail(row, None))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(row_to_order(header, details))
    }

    async fn update_order_invoice(
        &self,
        id: OrderId,
        invoice: &InvoiceNumber,
    ) -> Result<DateTime<Utc>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(orders::table.filter(orders::id.eq(id.get())))
            .set((
                orders::invoice_number.eq(invoice.as_str()),
                orders::updated_at.eq(diesel::dsl::now),
            ))
            .returning(orders::updated_at)
            .get_result::<DateTime<Utc>>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .ok_or_else(|| OrderRepositoryError::not_found(id.get()))
    }

    async fn list_all(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let headers: Vec<OrderRow> = orders::table
            .order(orders::id.asc())
            .select(OrderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let ids: Vec<i64> = headers.iter().map(|header| header.id).collect();
        let detail_rows = load_details(&mut conn, &ids).await?;

        assemble_orders(headers, detail_rows)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let header = orders::table
            .filter(orders::id.eq(id.get()))
            .select(OrderRow::as_select())
            .first::<OrderRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(header) = header else {
            return Ok(None);
        };
        let detail_rows = load_details(&mut conn, &[header.id]).await?;

        Ok(assemble_orders(vec![header], detail_rows)?.pop())
    }

    async fn delete(&self, id: OrderId) -> Result<bool, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(orders::table.filter(orders::id.eq(id.get())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row assembly and error mapping.
    use super::*;
    use chrono::{TimeZone, Utc};
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn header(id: i64, invoice: Option<&str>) -> OrderRow {
        let at = Utc
            .with_ymd_and_hms(2024, 3, 5, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        OrderRow {
            id,
            invoice_number: invoice.map(str::to_owned),
            order_date: at,
            total_price: Decimal::new(300_000, 2),
            created_at: at,
            updated_at: at,
        }
    }

    fn detail(id: i64, order_id: i64) -> DetailRows {
        let at = Utc
            .with_ymd_and_hms(2024, 3, 5, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        (
            OrderDetailRow {
                id,
                order_id,
                product_id: 7,
                quantity: 2,
                subtotal: Decimal::new(300_000, 2),
                created_at: at,
                updated_at: at,
            },
            ProductRow {
                id: 7,
                name: "Laptop".to_owned(),
                price: Decimal::new(150_000, 2),
                category_id: 1,
            },
            CategoryRow {
                id: 1,
                name: "Electronics".to_owned(),
            },
        )
    }

    #[rstest]
    fn assembly_groups_details_and_keeps_header_order() {
        let orders = assemble_orders(
            vec![header(1, Some("INV-20240305-1")), header(2, None)],
            vec![detail(10, 2), detail(11, 1), detail(12, 2)],
        )
        .expect("valid rows");

        assert_eq!(orders.len(), 2);
        let first_ids: Vec<_> = orders[0].details.iter().map(|d| d.id.get()).collect();
        let second_ids: Vec<_> = orders[1].details.iter().map(|d| d.id.get()).collect();
        assert_eq!(first_ids, vec![11]);
        assert_eq!(second_ids, vec![10, 12]);
        assert!(orders[1].invoice_number.is_none());
        assert!(orders[0].details[0].product.is_some());
    }

    #[rstest]
    fn orders_without_details_get_an_empty_list() {
        let orders = assemble_orders(vec![header(3, None)], Vec::new()).expect("valid rows");
        assert!(orders[0].details.is_empty());
    }

    #[rstest]
    fn foreign_key_failure_means_missing_product() {
        let err = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new(String::from("order_details_product_id_fkey")),
        ));
        assert_eq!(err, OrderRepositoryError::missing_product());
    }
}
