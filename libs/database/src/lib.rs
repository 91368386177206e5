//! Storage connectivity for the services in this workspace.
//!
//! # Features
//!
//! - `mongodb` (default): client construction from [`mongodb::MongoConfig`],
//!   startup retries and health probes
//! - `config`: `core_config::FromEnv` support for the config types
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_with_retry};
//! use database::retry::RetryPolicy;
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "store");
//! let client = connect_with_retry(&config, &RetryPolicy::default()).await?;
//! let db = client.database(config.database());
//! ```

pub mod retry;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use retry::{RetryPolicy, retry_with_backoff};
