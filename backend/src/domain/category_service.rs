//! Category use cases: uniqueness-checked writes and cached listing.

use std::sync::Arc;

use crate::domain::ports::{CategoryRepository, CategoryRepositoryError, ListCacheKey};
use crate::domain::{Category, CategoryId, CategoryName, Error, ReadThroughCache};

const NOT_FOUND: &str = "Category not found";

fn map_repository_error(error: CategoryRepositoryError) -> Error {
    match error {
        CategoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("category repository unavailable: {message}"))
        }
        CategoryRepositoryError::Query { message } => {
            Error::internal(format!("category repository error: {message}"))
        }
        CategoryRepositoryError::DuplicateName { .. } => Error::duplicate("name"),
        CategoryRepositoryError::Referenced => {
            Error::conflict("Category is still referenced by products")
        }
    }
}

/// Category service backed by a repository and the list cache.
#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
    cache: ReadThroughCache,
}

impl CategoryService {
    /// Create a service over the given repository and cache.
    pub fn new(repo: Arc<dyn CategoryRepository>, cache: ReadThroughCache) -> Self {
        Self { repo, cache }
    }

    /// Create a category after checking its name is unused.
    pub async fn create(&self, name: CategoryName) -> Result<Category, Error> {
        self.ensure_unique(&name, None).await?;
        self.cache
            .around_write(ListCacheKey::Categories, async {
                self.repo.create(&name).await.map_err(map_repository_error)
            })
            .await
    }

    /// Every category, served from the cache when warm.
    pub async fn list(&self) -> Result<Vec<Category>, Error> {
        self.cache
            .load(ListCacheKey::Categories, || async {
                self.repo.list_all().await.map_err(map_repository_error)
            })
            .await
    }

    /// A single category.
    pub async fn get(&self, id: CategoryId) -> Result<Category, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    /// Rename a category. The new name must not belong to another category.
    pub async fn update(&self, id: CategoryId, name: CategoryName) -> Result<Category, Error> {
        self.get(id).await?;
        self.ensure_unique(&name, Some(id)).await?;
        self.cache
            .around_write(ListCacheKey::Categories, async {
                self.repo
                    .update(id, &name)
                    .await
                    .map_err(map_repository_error)?
                    .ok_or_else(|| Error::not_found(NOT_FOUND))
            })
            .await
    }

    /// Delete a category that no product references.
    pub async fn delete(&self, id: CategoryId) -> Result<(), Error> {
        let deleted = self
            .cache
            .around_write(ListCacheKey::Categories, async {
                self.repo.delete(id).await.map_err(map_repository_error)
            })
            .await?;
        if !deleted {
            return Err(Error::not_found(NOT_FOUND));
        }
        Ok(())
    }

    async fn ensure_unique(
        &self,
        name: &CategoryName,
        excluding: Option<CategoryId>,
    ) -> Result<(), Error> {
        let taken = self
            .repo
            .name_exists(name, excluding)
            .await
            .map_err(map_repository_error)?;
        if taken {
            return Err(Error::duplicate("name"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "category_service_tests.rs"]
mod tests;
