//! PostgreSQL-backed `ProductRepository` implementation using Diesel ORM.
//!
//! Every read joins `categories` so returned products carry their category.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{ProductRepository, ProductRepositoryError};
use crate::domain::{CategoryId, Price, Product, ProductDraft, ProductId, ProductName};

use super::diesel_category_repository::row_to_category;
use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::{CategoryRow, ProductChanges, ProductRow};
use super::pool::{DbPool, PoolError};
use super::schema::{categories, products};

/// Diesel-backed implementation of the product repository port.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProductRepositoryError {
    ProductRepositoryError::connection(pool_error_message(error))
}

fn map_failure(failure: StoreFailure) -> ProductRepositoryError {
    match failure {
        StoreFailure::Connection(message) => ProductRepositoryError::connection(message),
        StoreFailure::Query(message) => ProductRepositoryError::query(message),
        StoreFailure::UniqueViolation => ProductRepositoryError::query("unique violation"),
        StoreFailure::ForeignKeyViolation => ProductRepositoryError::query("foreign key violation"),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ProductRepositoryError {
    map_failure(classify_diesel_error(error))
}

fn map_write_error(
    name: &ProductName,
) -> impl FnOnce(diesel::result::Error) -> ProductRepositoryError {
    move |error| match classify_diesel_error(error) {
        StoreFailure::UniqueViolation => ProductRepositoryError::duplicate_name(name.as_str()),
        StoreFailure::ForeignKeyViolation => ProductRepositoryError::missing_category(),
        other => map_failure(other),
    }
}

fn map_delete_error(error: diesel::result::Error) -> ProductRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::ForeignKeyViolation => ProductRepositoryError::referenced(),
        other => map_failure(other),
    }
}

/// Convert a product row and its joined category into a domain product.
pub(crate) fn row_to_product(
    row: ProductRow,
    category: CategoryRow,
) -> Result<Product, ProductRepositoryError> {
    let ProductRow {
        id,
        name,
        price,
        category_id,
    } = row;
    let invalid = |err: String| ProductRepositoryError::query(format!("stored product {id}: {err}"));

    let name = ProductName::new(&name).map_err(|err| invalid(err.to_string()))?;
    let price = Price::new(price).map_err(|err| invalid(err.to_string()))?;
    let category = row_to_category(category).map_err(|err| invalid(err.to_string()))?;

    Ok(Product {
        id: ProductId::new(id),
        name,
        price,
        category_id: CategoryId::new(category_id),
        category: Some(category),
    })
}

fn changes(draft: &ProductDraft) -> ProductChanges<'_> {
    ProductChanges {
        name: draft.name.as_str(),
        price: draft.price.amount(),
        category_id: draft.category_id.get(),
    }
}

async fn load_category(
    conn: &mut AsyncPgConnection,
    category_id: i64,
) -> Result<CategoryRow, ProductRepositoryError> {
    categories::table
        .filter(categories::id.eq(category_id))
        .select(CategoryRow::as_select())
        .first(conn)
        .await
        .map_err(map_diesel_error)
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn create(&self, draft: &ProductDraft) -> Result<Product, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::insert_into(products::table)
            .values(changes(draft))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_write_error(&draft.name))?;
        let category = load_category(&mut conn, row.category_id).await?;

        row_to_product(row, category)
    }

    async fn list_all(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(ProductRow, CategoryRow)> = products::table
            .inner_join(categories::table)
            .order(products::id.asc())
            .select((ProductRow::as_select(), CategoryRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(product, category)| row_to_product(product, category))
            .collect()
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(ProductRow, CategoryRow)> = products::table
            .inner_join(categories::table)
            .filter(products::id.eq(id.get()))
            .select((ProductRow::as_select(), CategoryRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|(product, category)| row_to_product(product, category))
            .transpose()
    }

    async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(products::table.filter(products::id.eq(id.get())))
            .set(changes(draft))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_write_error(&draft.name))?;
        let Some(row) = row else {
            return Ok(None);
        };
        let category = load_category(&mut conn, row.category_id).await?;

        row_to_product(row, category).map(Some)
    }

    async fn delete(&self, id: ProductId) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(products::table.filter(products::id.eq(id.get())))
            .execute(&mut conn)
            .await
            .map_err(map_delete_error)?;

        Ok(deleted > 0)
    }

    async fn name_exists_in_category(
        &self,
        name: &ProductName,
        category_id: CategoryId,
        excluding: Option<ProductId>,
    ) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let same_name = products::table
            .filter(products::name.eq(name.as_str()))
            .filter(products::category_id.eq(category_id.get()));
        let count: i64 = match excluding {
            Some(excluded) => {
                same_name
                    .filter(products::id.ne(excluded.get()))
                    .count()
                    .get_result(&mut conn)
                    .await
            }
            None => same_name.count().get_result(&mut conn).await,
        }
        .map_err(map_diesel_error)?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion and constraint mapping.
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn category_row() -> CategoryRow {
        CategoryRow {
            id: 1,
            name: "Electronics".to_owned(),
        }
    }

    #[rstest]
    fn row_conversion_attaches_category() {
        let product = row_to_product(
            ProductRow {
                id: 2,
                name: "Laptop".to_owned(),
                price: Decimal::new(150_000, 2),
                category_id: 1,
            },
            category_row(),
        )
        .expect("valid row");

        assert_eq!(product.price.amount(), Decimal::new(150_000, 2));
        assert_eq!(
            product.category.map(|category| category.id),
            Some(CategoryId::new(1))
        );
    }

    #[rstest]
    fn row_conversion_rejects_non_positive_price() {
        let err = row_to_product(
            ProductRow {
                id: 2,
                name: "Laptop".to_owned(),
                price: Decimal::ZERO,
                category_id: 1,
            },
            category_row(),
        )
        .expect_err("invalid price");
        assert!(matches!(err, ProductRepositoryError::Query { .. }));
    }

    #[rstest]
    #[case(DatabaseErrorKind::UniqueViolation, ProductRepositoryError::duplicate_name("Laptop"))]
    #[case(DatabaseErrorKind::ForeignKeyViolation, ProductRepositoryError::missing_category())]
    fn write_constraint_violations_are_classified(
        #[case] kind: DatabaseErrorKind,
        #[case] expected: ProductRepositoryError,
    ) {
        let name = ProductName::new("Laptop").expect("valid name");
        let err = map_write_error(&name)(DieselError::DatabaseError(
            kind,
            Box::new(String::from("constraint")),
        ));
        assert_eq!(err, expected);
    }

    #[rstest]
    fn delete_foreign_key_violation_means_referenced() {
        let err = map_delete_error(DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new(String::from("still referenced")),
        ));
        assert_eq!(err, ProductRepositoryError::referenced());
    }
}
