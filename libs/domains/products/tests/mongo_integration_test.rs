//! MongoDB repository tests against a real server.
//!
//! Run with `cargo test -p domain_products -- --ignored` (requires Docker).

use domain_products::*;
use ::mongodb::bson::{doc, Document};
use test_utils::{assertions::assert_sorted_by, TestDataBuilder, TestMongo};

async fn repository(mongo: &TestMongo, test_name: &str) -> MongoProductRepository {
    let builder = TestDataBuilder::from_test_name(test_name);
    let repo = MongoProductRepository::new(&mongo.database(&builder.database_name()));
    repo.init_indexes().await.unwrap();
    repo
}

fn new_product(name: &str, stock: i32) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        stock,
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_insert_and_fetch() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo, "insert_and_fetch").await;

    let created = repo.insert(new_product("Lamp", 3)).await.unwrap();
    assert_eq!(created.id.len(), 24);

    assert_eq!(repo.fetch_by_id(&created.id).await.unwrap(), created);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_invalid_and_unknown_ids() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo, "invalid_and_unknown_ids").await;

    assert_eq!(
        repo.fetch_by_id("nope").await,
        Err(RepositoryError::InvalidId("nope".into()))
    );
    assert_eq!(
        repo.delete("665f1f77bcf86cd799439011").await,
        Err(RepositoryError::NotFound("665f1f77bcf86cd799439011".into()))
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_merge_update_and_soft_delete() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("merge_update_and_soft_delete");
    let db = mongo.database(&builder.database_name());
    let repo = MongoProductRepository::new(&db);

    let created = repo.insert(new_product("Chair", 9)).await.unwrap();

    let updated = repo
        .merge_update(
            &created.id,
            UpdateProductFields {
                name: Some(String::new()),
                stock: Some(0),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Chair");
    assert_eq!(updated.stock, 0);

    repo.delete(&created.id).await.unwrap();
    assert!(matches!(
        repo.fetch_by_id(&created.id).await,
        Err(RepositoryError::NotFound(_))
    ));

    // The document stays in the collection, marked deleted.
    let raw = db
        .collection::<Document>("products")
        .find_one(doc! {})
        .await
        .unwrap()
        .unwrap();
    assert!(raw.contains_key("deleted_at"));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_fetch_page_filters_and_orders() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo, "fetch_page_filters_and_orders").await;

    for name in ["Red Widget", "Gadget", "widget (XL)", "WIDGET.2"] {
        repo.insert(new_product(name, 1)).await.unwrap();
    }

    let query = GetProductsQuery {
        page: 1,
        limit: 2,
        name: Some("widget".into()),
    }
    .normalized();
    let (items, pagination) = repo.fetch_page(&query).await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(pagination.total, 3);
    assert_eq!(pagination.last_page, 2);
    assert_sorted_by(&items, |p| p.id.clone(), "page order");

    let literal = GetProductsQuery {
        page: 1,
        limit: 5,
        name: Some("(XL)".into()),
    }
    .normalized();
    let (items, _) = repo.fetch_page(&literal).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "widget (XL)");
}
