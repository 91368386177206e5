//! MongoDB implementation of [`ProductRepository`].
//!
//! Stored shape (collection `products` by default):
//!
//! ```text
//! { _id: ObjectId, name_product: String, stock: Int32,
//!   created_at: Date, updated_at: Date?, deleted_at: Date? }
//! ```
//!
//! Deletion is soft: `delete` stamps `deleted_at` and every query only
//! matches documents without it.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument};

use crate::error::{RepositoryError, RepositoryResult};
use crate::models::{GetProductsQuery, NewProduct, PaginationInfo, Product, UpdateProductFields};
use crate::repository::ProductRepository;

pub const DEFAULT_COLLECTION: &str = "products";

/// Document schema. Never leaves this module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ProductDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name_product: String,
    stock: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deleted_at: Option<DateTime>,
}

impl ProductDocument {
    fn new(product: NewProduct, now: DateTime) -> Self {
        Self {
            id: None,
            name_product: product.name,
            stock: product.stock,
            created_at: Some(now),
            updated_at: None,
            deleted_at: None,
        }
    }

    fn into_product(self) -> RepositoryResult<Product> {
        let id = self
            .id
            .ok_or_else(|| RepositoryError::Storage("product document without _id".into()))?;

        Ok(Product {
            id: id.to_hex(),
            name: self.name_product,
            stock: self.stock,
        })
    }
}

fn parse_id(id: &str) -> RepositoryResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| RepositoryError::InvalidId(id.to_string()))
}

/// Adds the "not deleted" condition to `filter`.
fn live(mut filter: Document) -> Document {
    filter.insert("deleted_at", doc! { "$exists": false });
    filter
}

fn by_id(id: ObjectId) -> Document {
    live(doc! { "_id": id })
}

/// Filter for a page query: live documents, optionally with a
/// case-insensitive substring match on the name. The text is escaped so it
/// is matched literally.
fn build_filter(query: &GetProductsQuery) -> Document {
    let mut filter = Document::new();

    if let Some(name) = query.name_filter() {
        filter.insert(
            "name_product",
            doc! { "$regex": regex::escape(name), "$options": "i" },
        );
    }

    live(filter)
}

/// `$set` document for the present fields, `None` when nothing changes.
fn build_update(fields: &UpdateProductFields, now: DateTime) -> Option<Document> {
    if fields.is_empty() {
        return None;
    }

    let mut set = doc! { "updated_at": now };
    if let Some(name) = fields.effective_name() {
        set.insert("name_product", name);
    }
    if let Some(stock) = fields.stock {
        set.insert("stock", stock);
    }

    Some(doc! { "$set": set })
}

/// Window options for a page query. The server takes `skip` as a signed
/// 64-bit value, so larger skips are clamped; they match nothing either way.
fn find_options(query: &GetProductsQuery) -> FindOptions {
    FindOptions::builder()
        .skip(query.skip().min(i64::MAX as u64))
        .limit(query.limit.max(1))
        .sort(doc! { "_id": 1 })
        .build()
}

fn log_elapsed(operation: &'static str, started: Instant) {
    debug!(
        operation,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "mongodb operation finished"
    );
}

pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<ProductDocument>(collection_name),
        }
    }

    /// Creates the indexes used by name filtering and the live-document check.
    pub async fn init_indexes(&self) -> RepositoryResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "name_product": 1 })
                .options(IndexOptions::builder().name("idx_name_product".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "deleted_at": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_deleted_at".to_string())
                        .sparse(true)
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!(collection = %self.collection.name(), "product indexes ensured");
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self))]
    async fn fetch_by_id(&self, id: &str) -> RepositoryResult<Product> {
        let oid = parse_id(id)?;
        let started = Instant::now();

        let found = self.collection.find_one(by_id(oid)).await;
        log_elapsed("fetch_by_id", started);

        found?
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?
            .into_product()
    }

    #[instrument(skip(self))]
    async fn fetch_page(
        &self,
        query: &GetProductsQuery,
    ) -> RepositoryResult<(Vec<Product>, PaginationInfo)> {
        let filter = build_filter(query);
        let options = find_options(query);
        let started = Instant::now();

        let cursor = self.collection.find(filter.clone()).with_options(options).await?;
        let documents: Vec<ProductDocument> = cursor.try_collect().await?;
        let total = self.collection.count_documents(filter).await?;
        log_elapsed("fetch_page", started);

        let items = documents
            .into_iter()
            .map(ProductDocument::into_product)
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((items, PaginationInfo::new(total, query)))
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn insert(&self, product: NewProduct) -> RepositoryResult<Product> {
        let mut document = ProductDocument::new(product, DateTime::now());
        let started = Instant::now();

        let result = self.collection.insert_one(&document).await;
        log_elapsed("insert", started);

        let id = result?.inserted_id.as_object_id().ok_or_else(|| {
            RepositoryError::Storage("insert did not return an ObjectId".into())
        })?;
        document.id = Some(id);

        tracing::info!(product_id = %id, "product created");
        document.into_product()
    }

    #[instrument(skip(self))]
    async fn merge_update(
        &self,
        id: &str,
        fields: UpdateProductFields,
    ) -> RepositoryResult<Product> {
        let oid = parse_id(id)?;
        let started = Instant::now();

        let updated = match build_update(&fields, DateTime::now()) {
            Some(update) => {
                let options = FindOneAndUpdateOptions::builder()
                    .return_document(ReturnDocument::After)
                    .build();
                self.collection
                    .find_one_and_update(by_id(oid), update)
                    .with_options(options)
                    .await
            }
            None => self.collection.find_one(by_id(oid)).await,
        };
        log_elapsed("merge_update", started);

        updated?
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?
            .into_product()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let oid = parse_id(id)?;
        let started = Instant::now();

        let result = self
            .collection
            .update_one(by_id(oid), doc! { "$set": { "deleted_at": DateTime::now() } })
            .await;
        log_elapsed("delete", started);

        if result?.matched_count == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        tracing::info!(product_id = %oid, "product deleted");
        Ok(())
    }
}
