//! Port for category persistence.

use async_trait::async_trait;

use crate::domain::{Category, CategoryId, CategoryName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by category repository adapters.
    pub enum CategoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "category repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "category repository query failed: {message}",
        /// The unique name constraint rejected the write.
        DuplicateName { name: String } =>
            "category name already exists: {name}",
        /// Products still reference the category.
        Referenced =>
            "category is still referenced by products",
    }
}

/// Port for reading and writing categories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a category and return the stored row.
    async fn create(&self, name: &CategoryName) -> Result<Category, CategoryRepositoryError>;

    /// Read every category ordered by id.
    async fn list_all(&self) -> Result<Vec<Category>, CategoryRepositoryError>;

    /// Find a category by id.
    async fn find_by_id(&self, id: CategoryId)
    -> Result<Option<Category>, CategoryRepositoryError>;

    /// Rename a category; `None` when no row has that id.
    async fn update(
        &self,
        id: CategoryId,
        name: &CategoryName,
    ) -> Result<Option<Category>, CategoryRepositoryError>;

    /// Delete a category; `false` when no row has that id.
    async fn delete(&self, id: CategoryId) -> Result<bool, CategoryRepositoryError>;

    /// Whether another category already uses `name`.
    async fn name_exists(
        &self,
        name: &CategoryName,
        excluding: Option<CategoryId>,
    ) -> Result<bool, CategoryRepositoryError>;
}
