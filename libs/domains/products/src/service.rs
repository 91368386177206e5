//! Product service: input rules, deadlines and error translation.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, Span};

use crate::error::{ProductError, ProductResult, RepositoryResult};
use crate::models::{
    CreateProductRequest, GetProductsQuery, Product, ProductPage, UpdateProductFields,
};
use crate::repository::ProductRepository;

/// Deadline applied to each repository call unless configured otherwise.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Product service providing the CRUD operations.
///
/// Every repository call runs under `operation_timeout`; an overrun is
/// reported as an internal error and the storage call is dropped.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    operation_timeout: Duration,
    span: Span,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            operation_timeout: self.operation_timeout,
            span: self.span.clone(),
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self::from_shared(Arc::new(repository))
    }

    /// Builds a service over a repository that is also used elsewhere.
    pub fn from_shared(repository: Arc<R>) -> Self {
        Self {
            repository,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            span: Span::none(),
        }
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Parent span for every operation's span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[instrument(parent = &self.span, skip(self))]
    pub async fn get_product(&self, id: &str) -> ProductResult<Product> {
        self.call("get_product", self.repository.fetch_by_id(id))
            .await
    }

    /// Normalizes `query` before handing it to storage.
    #[instrument(parent = &self.span, skip(self))]
    pub async fn get_products(&self, query: GetProductsQuery) -> ProductResult<ProductPage> {
        let query = query.normalized();
        let (items, pagination) = self
            .call("get_products", self.repository.fetch_page(&query))
            .await?;

        Ok(ProductPage { items, pagination })
    }

    /// Rejects invalid input without touching storage.
    #[instrument(parent = &self.span, skip(self, request), fields(name_product = %request.name))]
    pub async fn create_product(&self, request: CreateProductRequest) -> ProductResult<Product> {
        let product = request.into_new_product().map_err(|violation| {
            info!(field = violation.field, reason = %violation.reason, "create rejected");
            ProductError::from(violation)
        })?;

        self.call("create_product", self.repository.insert(product))
            .await
    }

    #[instrument(parent = &self.span, skip(self, fields))]
    pub async fn update_product(
        &self,
        id: &str,
        fields: UpdateProductFields,
    ) -> ProductResult<Product> {
        self.call("update_product", self.repository.merge_update(id, fields))
            .await
    }

    #[instrument(parent = &self.span, skip(self))]
    pub async fn delete_product(&self, id: &str) -> ProductResult<()> {
        self.call("delete_product", self.repository.delete(id))
            .await
    }

    async fn call<T, F>(&self, operation: &'static str, fut: F) -> ProductResult<T>
    where
        F: Future<Output = RepositoryResult<T>>,
    {
        let started = Instant::now();
        let outcome = match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result.map_err(|err| ProductError::from_repository(operation, err)),
            Err(_) => Err(ProductError::Internal {
                operation,
                reason: format!(
                    "operation cancelled after {}ms",
                    self.operation_timeout.as_millis()
                ),
            }),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(_) => debug!(operation, elapsed_ms, "operation succeeded"),
            Err(err) if err.is_internal() => {
                error!(operation, elapsed_ms, error = %err, "operation failed")
            }
            Err(err) => info!(operation, elapsed_ms, error = %err, "operation rejected"),
        }

        outcome
    }
}
