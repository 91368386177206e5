//! In-process [`ProductRepository`] used by tests and local runs without a
//! database. Behaves like the MongoDB adapter: soft delete, insertion order,
//! case-insensitive name filter.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{RepositoryError, RepositoryResult};
use crate::models::{GetProductsQuery, NewProduct, PaginationInfo, Product, UpdateProductFields};
use crate::repository::ProductRepository;

#[derive(Debug, Clone)]
struct StoredProduct {
    product: Product,
    deleted: bool,
}

#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<StoredProduct>>,
    failure: Option<String>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose every call fails with a storage error.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            products: RwLock::default(),
            failure: Some(reason.into()),
        }
    }

    fn check_available(&self) -> RepositoryResult<()> {
        match &self.failure {
            Some(reason) => Err(RepositoryError::Storage(reason.clone())),
            None => Ok(()),
        }
    }
}

fn parse_id(id: &str) -> RepositoryResult<Uuid> {
    Uuid::try_parse(id).map_err(|_| RepositoryError::InvalidId(id.to_string()))
}

fn matches_name(product: &Product, needle: Option<&str>) -> bool {
    needle.is_none_or(|needle| {
        product
            .name
            .to_lowercase()
            .contains(&needle.to_lowercase())
    })
}

/// Index of the live product stored under `id`.
fn position_live(products: &[StoredProduct], id: &str) -> RepositoryResult<usize> {
    let uuid = parse_id(id)?.simple().to_string();
    products
        .iter()
        .position(|stored| !stored.deleted && stored.product.id == uuid)
        .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn fetch_by_id(&self, id: &str) -> RepositoryResult<Product> {
        self.check_available()?;
        let products = self.products.read().await;
        let index = position_live(&products, id)?;
        Ok(products[index].product.clone())
    }

    async fn fetch_page(
        &self,
        query: &GetProductsQuery,
    ) -> RepositoryResult<(Vec<Product>, PaginationInfo)> {
        self.check_available()?;
        let products = self.products.read().await;
        let needle = query.name_filter();

        let matching: Vec<&Product> = products
            .iter()
            .filter(|stored| !stored.deleted)
            .map(|stored| &stored.product)
            .filter(|product| matches_name(product, needle))
            .collect();

        let total = matching.len() as u64;
        let skip = usize::try_from(query.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit.max(1)).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect();

        Ok((items, PaginationInfo::new(total, query)))
    }

    async fn insert(&self, product: NewProduct) -> RepositoryResult<Product> {
        self.check_available()?;
        let product = Product {
            id: Uuid::now_v7().simple().to_string(),
            name: product.name,
            stock: product.stock,
        };

        self.products.write().await.push(StoredProduct {
            product: product.clone(),
            deleted: false,
        });
        Ok(product)
    }

    async fn merge_update(
        &self,
        id: &str,
        fields: UpdateProductFields,
    ) -> RepositoryResult<Product> {
        self.check_available()?;
        let mut products = self.products.write().await;
        let index = position_live(&products, id)?;
        let product = &mut products[index].product;
        product.apply(&fields);
        Ok(product.clone())
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        self.check_available()?;
        let mut products = self.products.write().await;
        let index = position_live(&products, id)?;
        products[index].deleted = true;
        Ok(())
    }
}
