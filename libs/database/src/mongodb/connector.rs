use mongodb::{Client, bson::doc, options::ClientOptions};
use tracing::{info, instrument};

use super::MongoConfig;
use crate::retry::{RetryPolicy, retry_with_backoff};

#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

/// Translates a [`MongoConfig`] into driver options.
pub(crate) async fn client_options(config: &MongoConfig) -> Result<ClientOptions, MongoError> {
    let mut options = ClientOptions::parse(config.url()).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.max_idle_time = Some(config.max_idle_time);
    options.connect_timeout = Some(config.connect_timeout);
    options.server_selection_timeout = Some(config.server_selection_timeout);
    if let Some(app_name) = &config.app_name {
        options.app_name = Some(app_name.clone());
    }

    Ok(options)
}

/// Builds a client and verifies the deployment answers a `ping`.
#[instrument(skip(config), fields(database = %config.database()))]
pub async fn connect(config: &MongoConfig) -> Result<Client, MongoError> {
    let client = Client::with_options(client_options(config).await?)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| MongoError::ConnectionFailed(e.to_string()))?;

    info!(max_pool_size = config.max_pool_size, "connected to MongoDB");
    Ok(client)
}

/// [`connect`] with exponential backoff, for startup when the database may
/// still be coming up.
pub async fn connect_with_retry(
    config: &MongoConfig,
    policy: &RetryPolicy,
) -> Result<Client, MongoError> {
    retry_with_backoff(policy, || connect(config)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_client_options_apply_pool_settings() {
        let mut config = MongoConfig::with_database("mongodb://localhost:27017", "store")
            .with_pool_size(10, 2)
            .with_app_name("products-api");
        config.max_idle_time = Duration::from_secs(60);

        let options = client_options(&config).await.unwrap();

        assert_eq!(options.max_pool_size, Some(10));
        assert_eq!(options.min_pool_size, Some(2));
        assert_eq!(options.max_idle_time, Some(Duration::from_secs(60)));
        assert_eq!(options.app_name.as_deref(), Some("products-api"));
    }

    #[tokio::test]
    async fn test_client_options_reject_bad_url() {
        let config = MongoConfig::new("postgres://localhost:5432");
        assert!(client_options(&config).await.is_err());
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_connect() {
        let url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        assert!(connect(&MongoConfig::new(url)).await.is_ok());
    }
}
