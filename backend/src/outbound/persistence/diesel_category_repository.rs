//! PostgreSQL-backed `CategoryRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CategoryRepository, CategoryRepositoryError};
use crate::domain::{Category, CategoryId, CategoryName};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::{CategoryChanges, CategoryRow};
use super::pool::{DbPool, PoolError};
use super::schema::categories;

/// Diesel-backed implementation of the category repository port.
#[derive(Clone)]
pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CategoryRepositoryError {
    CategoryRepositoryError::connection(pool_error_message(error))
}

fn map_write_error(name: &CategoryName) -> impl FnOnce(diesel::result::Error) -> CategoryRepositoryError {
    move |error| match classify_diesel_error(error) {
        StoreFailure::UniqueViolation => CategoryRepositoryError::duplicate_name(name.as_str()),
        other => map_failure(other),
    }
}

fn map_delete_error(error: diesel::result::Error) -> CategoryRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::ForeignKeyViolation => CategoryRepositoryError::referenced(),
        other => map_failure(other),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> CategoryRepositoryError {
    map_failure(classify_diesel_error(error))
}

fn map_failure(failure: StoreFailure) -> CategoryRepositoryError {
    match failure {
        StoreFailure::Connection(message) => CategoryRepositoryError::connection(message),
        StoreFailure::Query(message) => CategoryRepositoryError::query(message),
        StoreFailure::UniqueViolation => CategoryRepositoryError::query("unique violation"),
        StoreFailure::ForeignKeyViolation => CategoryRepositoryError::query("foreign key violation"),
    }
}

/// Convert a database row into a validated domain category.
pub(crate) fn row_to_category(row: CategoryRow) -> Result<Category, CategoryRepositoryError> {
    let name = CategoryName::new(&row.name)
        .map_err(|err| CategoryRepositoryError::query(format!("stored category {}: {err}", row.id)))?;
    Ok(Category {
        id: CategoryId::new(row.id),
        name,
    })
}

#[async_trait]
impl CategoryRepository for DieselCategoryRepository {
    async fn create(&self, name: &CategoryName) -> Result<Category, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::insert_into(categories::table)
            .values(CategoryChanges {
                name: name.as_str(),
            })
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_write_error(name))?;

        row_to_category(row)
    }

    async fn list_all(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CategoryRow> = categories::table
            .order(categories::id.asc())
            .select(CategoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_category).collect()
    }

    async fn find_by_id(
        &self,
        id: CategoryId,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = categories::table
            .filter(categories::id.eq(id.get()))
            .select(CategoryRow::as_select())
            .first::<CategoryRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_category).transpose()
    }

    async fn update(
        &self,
        id: CategoryId,
        name: &CategoryName,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(categories::table.filter(categories::id.eq(id.get())))
            .set(CategoryChanges {
                name: name.as_str(),
            })
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_write_error(name))?;

        row.map(row_to_category).transpose()
    }

    async fn delete(&self, id: CategoryId) -> Result<bool, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(categories::table.filter(categories::id.eq(id.get())))
            .execute(&mut conn)
            .await
            .map_err(map_delete_error)?;

        Ok(deleted > 0)
    }

    async fn name_exists(
        &self,
        name: &CategoryName,
        excluding: Option<CategoryId>,
    ) -> Result<bool, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let same_name = categories::table.filter(categories::name.eq(name.as_str()));
        let count: i64 = match excluding {
            Some(excluded) => {
                same_name
                    .filter(categories::id.ne(excluded.get()))
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
