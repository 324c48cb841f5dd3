//! Product use cases.
//!
//! Writes verify that the owning category exists and that the name is free
//! within that category before touching storage.

use std::sync::Arc;

use crate::domain::ports::{
    CategoryRepository, CategoryRepositoryError, ListCacheKey, ProductRepository,
    ProductRepositoryError,
};
use crate::domain::{Error, Product, ProductDraft, ProductId, ReadThroughCache};

const NOT_FOUND: &str = "Product not found";

fn missing_category() -> Error {
    let mut fields = crate::domain::FieldErrors::default();
    fields.insert(
        "category_id",
        "category_id must reference an existing category",
    );
    Error::validation(fields)
}

fn map_repository_error(error: ProductRepositoryError) -> Error {
    match error {
        ProductRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("product repository unavailable: {message}"))
        }
        ProductRepositoryError::Query { message } => {
            Error::internal(format!("product repository error: {message}"))
        }
        ProductRepositoryError::DuplicateName { .. } => Error::duplicate("name"),
        ProductRepositoryError::MissingCategory => missing_category(),
        ProductRepositoryError::Referenced => {
            Error::conflict("Product is still referenced by order details")
        }
    }
}

fn map_category_error(error: CategoryRepositoryError) -> Error {
    match error {
        CategoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("category repository unavailable: {message}"))
        }
        other => Error::internal(format!("category repository error: {other}")),
    }
}

/// Product service backed by product and category repositories.
#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
    cache: ReadThroughCache,
}

impl ProductService {
    /// Create a service over the given repositories and cache.
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
        cache: ReadThroughCache,
    ) -> Self {
        Self {
            products,
            categories,
            cache,
        }
    }

    /// Create a product in an existing category.
    pub async fn create(&self, draft: ProductDraft) -> Result<Product, Error> {
        self.check_draft(&draft, None).await?;
        self.cache
            .around_write(ListCacheKey::Products, async {
                self.products
                    .create(&draft)
                    .await
                    .map_err(map_repository_error)
            })
            .await
    }

    /// Every product with its category, served from the cache when warm.
    pub async fn list(&self) -> Result<Vec<Product>, Error> {
        self.cache
            .load(ListCacheKey::Products, || async {
                self.products.list_all().await.map_err(map_repository_error)
            })
            .await
    }

    /// A single product with its category.
    pub async fn get(&self, id: ProductId) -> Result<Product, Error> {
        self.products
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    /// Replace a product's name, price and category.
    pub async fn update(&self, id: ProductId, draft: ProductDraft) -> Result<Product, Error> {
        self.get(id).await?;
        self.check_draft(&draft, Some(id)).await?;
        self.cache
            .around_write(ListCacheKey::Products, async {
                self.products
                    .update(id, &draft)
                    .await
                    .map_err(map_repository_error)?
                    .ok_or_else(|| Error::not_found(NOT_FOUND))
            })
            .await
    }

    /// Delete a product that no order detail references.
    pub async fn delete(&self, id: ProductId) -> Result<(), Error> {
        let deleted = self
            .cache
            .around_write(ListCacheKey::Products, async {
                self.products
                    .delete(id)
                    .await
                    .map_err(map_repository_error)
            })
            .await?;
        if !deleted {
            return Err(Error::not_found(NOT_FOUND));
        }
        Ok(())
    }

    async fn check_draft(
        &self,
        draft: &ProductDraft,
        excluding: Option<ProductId>,
    ) -> Result<(), Error> {
        let category = self
            .categories
            .find_by_id(draft.category_id)
            .await
            .map_err(map_category_error)?;
        if category.is_none() {
            return Err(missing_category());
        }

        let taken = self
            .products
            .name_exists_in_category(&draft.name, draft.category_id, excluding)
            .await
            .map_err(map_repository_error)?;
        if taken {
            return Err(Error::duplicate("name"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "product_service_tests.rs"]
mod tests;
