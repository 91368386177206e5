//! Configuration for Products API

use core_config::{app_info, env_or_default, env_parse, server::ServerConfig, AppInfo, FromEnv};
use core_config::ConfigError;
use database::mongodb::MongoConfig;
use std::time::Duration;

pub use core_config::Environment;

/// Product catalog settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductsConfig {
    pub collection: String,
    /// Deadline for each storage call made by the service.
    pub operation_timeout: Duration,
}

impl Default for ProductsConfig {
    fn default() -> Self {
        Self {
            collection: "products".to_string(),
            operation_timeout: Duration::from_millis(5000),
        }
    }
}

impl FromEnv for ProductsConfig {
    /// Reads PRODUCTS_COLLECTION and PRODUCTS_OPERATION_TIMEOUT_MS.
    fn from_env() -> Result<Self, ConfigError> {
        let collection = env_or_default("PRODUCTS_COLLECTION", "products");
        let timeout_ms = env_parse("PRODUCTS_OPERATION_TIMEOUT_MS", 5000u64)?;

        if timeout_ms == 0 {
            return Err(ConfigError::ParseError {
                key: "PRODUCTS_OPERATION_TIMEOUT_MS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            collection,
            operation_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub products: ProductsConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let products = ProductsConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            products,
            environment,
        })
    }
}
