use std::time::Duration;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_or_default, env_parse};

/// Connection settings for a MongoDB deployment.
///
/// ```ignore
/// use database::mongodb::MongoConfig;
///
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "store")
///     .with_pool_size(10, 1)
///     .with_app_name("products-api");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MongoConfig {
    /// Connection string, `mongodb://[user:pass@]host[:port][/db][?options]`.
    pub url: String,
    pub database: String,
    /// Reported to the server in its connection logs.
    pub app_name: Option<String>,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    /// Idle pooled connections are closed after this long.
    pub max_idle_time: Duration,
    pub connect_timeout: Duration,
    pub server_selection_timeout: Duration,
}

impl MongoConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn with_pool_size(mut self, max: u32, min: u32) -> Self {
        self.max_pool_size = max;
        self.min_pool_size = min.min(max);
        self
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: "store".to_string(),
            app_name: None,
            max_pool_size: 10,
            min_pool_size: 1,
            max_idle_time: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            server_selection_timeout: Duration::from_secs(30),
        }
    }
}

/// Environment variables (all optional):
/// - `MONGODB_URL`, falling back to `MONGO_URL`
/// - `MONGODB_DATABASE` (default `store`)
/// - `MONGODB_APP_NAME`
/// - `MONGODB_MAX_POOL_SIZE` (10), `MONGODB_MIN_POOL_SIZE` (1)
/// - `MONGODB_MAX_IDLE_TIME_SECS` (60)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (10)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (30)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let url = std::env::var("MONGODB_URL")
            .or_else(|_| std::env::var("MONGO_URL"))
            .unwrap_or(defaults.url);
        let database = env_or_default("MONGODB_DATABASE", &defaults.database);
        let app_name = std::env::var("MONGODB_APP_NAME").ok();

        let max_pool_size = env_parse("MONGODB_MAX_POOL_SIZE", defaults.max_pool_size)?;
        let min_pool_size = env_parse("MONGODB_MIN_POOL_SIZE", defaults.min_pool_size)?;
        if min_pool_size > max_pool_size {
            return Err(ConfigError::ParseError {
                key: "MONGODB_MIN_POOL_SIZE".to_string(),
                details: format!("{min_pool_size} exceeds MONGODB_MAX_POOL_SIZE {max_pool_size}"),
            });
        }

        let secs = |key: &str, default: Duration| {
            env_parse(key, default.as_secs()).map(Duration::from_secs)
        };

        Ok(Self {
            url,
            database,
            app_name,
            max_pool_size,
            min_pool_size,
            max_idle_time: secs("MONGODB_MAX_IDLE_TIME_SECS", defaults.max_idle_time)?,
            connect_timeout: secs("MONGODB_CONNECT_TIMEOUT_SECS", defaults.connect_timeout)?,
            server_selection_timeout: secs(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                defaults.server_selection_timeout,
            )?,
        })
    }
}
