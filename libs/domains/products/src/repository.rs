use async_trait::async_trait;

use crate::error::RepositoryResult;
use crate::models::{GetProductsQuery, NewProduct, PaginationInfo, Product, UpdateProductFields};

/// Storage capabilities the product service depends on.
///
/// Implementations own the stored representation and the id encoding.
/// Deleted products must be invisible to every method. Each call is a single
/// storage round trip and is cancelled by dropping its future.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Fails with `NotFound` for unknown or deleted ids, `InvalidId` for
    /// malformed ones.
    async fn fetch_by_id(&self, id: &str) -> RepositoryResult<Product>;

    /// One window of products plus the filtered total. `query` is expected
    /// to be normalized.
    async fn fetch_page(
        &self,
        query: &GetProductsQuery,
    ) -> RepositoryResult<(Vec<Product>, PaginationInfo)>;

    /// Stores a product under a freshly assigned id.
    async fn insert(&self, product: NewProduct) -> RepositoryResult<Product>;

    /// Applies only the present fields and returns the product after the update.
    async fn merge_update(
        &self,
        id: &str,
        fields: UpdateProductFields,
    ) -> RepositoryResult<Product>;

    /// Fails with `NotFound` when nothing live matched `id`.
    async fn delete(&self, id: &str) -> RepositoryResult<()>;
}
