//! Shared state handed to route constructors.

use mongodb::{Client, Database};
use std::sync::Arc;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Pooled client; clones share the pool.
    pub mongo_client: Client,
    /// Handle to the configured database.
    pub db: Database,
}

impl AppState {
    pub fn new(config: Config, mongo_client: Client) -> Self {
        let db = mongo_client.database(config.mongodb.database());
        Self {
            config: Arc::new(config),
            mongo_client,
            db,
        }
    }
}
