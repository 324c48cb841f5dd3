//! Cache keys for memoised "list all" queries.

/// Key naming one entity type's cached listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListCacheKey {
    /// Every category.
    Categories,
    /// Every product with its category.
    Products,
    /// Every order with details, products and categories.
    Orders,
}

impl ListCacheKey {
    /// Borrow the key as stored in the cache backend.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Categories => "categories:all",
            Self::Products => "products:all",
            Self::Orders => "orders:all",
        }
    }

    /// Keys whose payloads embed rows written through `self`.
    ///
    /// Product listings embed categories and order listings embed products,
    /// so a write invalidates its own key and every key downstream of it.
    pub const fn affected_by_write(self) -> &'static [ListCacheKey] {
        match self {
            Self::Categories => &[Self::Categories, Self::Products, Self::Orders],
            Self::Products => &[Self::Products, Self::Orders],
            Self::Orders => &[Self::Orders],
        }
    }
}

impl std::fmt::Display for ListCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ListCacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
