//! Port for product persistence.

use async_trait::async_trait;

use crate::domain::{CategoryId, Product, ProductDraft, ProductId, ProductName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by product repository adapters.
    pub enum ProductRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "product repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "product repository query failed: {message}",
        /// The (name, category) unique constraint rejected the write.
        DuplicateName { name: String } =>
            "product name already exists in category: {name}",
        /// The referenced category does not exist.
        MissingCategory =>
            "referenced category does not exist",
        /// Order details still reference the product.
        Referenced =>
            "product is still referenced by order details",
    }
}

/// Port for reading and writing products.
///
/// Reads attach the owning category to every returned product.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product and return the stored row.
    async fn create(&self, draft: &ProductDraft) -> Result<Product, ProductRepositoryError>;

    /// Read every product ordered by id.
    async fn list_all(&self) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Find a product by id.
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, ProductRepositoryError>;

    /// Replace a product's fields; `None` when no row has that id.
    async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, ProductRepositoryError>;

    /// Delete a product; `false` when no row has that id.
    async fn delete(&self, id: ProductId) -> Result<bool, ProductRepositoryError>;

    /// Whether another product in `category_id` already uses `name`.
    async fn name_exists_in_category(
        &self,
        name: &ProductName,
        category_id: CategoryId,
        excluding: Option<ProductId>,
    ) -> Result<bool, ProductRepositoryError>;
}
