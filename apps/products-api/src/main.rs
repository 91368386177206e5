//! Products API - REST server for the product catalog

use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::{mongodb::connect_with_retry, RetryPolicy};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        database = config.mongodb.database(),
        pool_max = config.mongodb.max_pool_size,
        "Connecting to MongoDB"
    );

    // Retried at startup only; requests never retry.
    let mongo_client = connect_with_retry(&config.mongodb, &RetryPolicy::default()).await?;

    info!(
        database = config.mongodb.database(),
        "Successfully connected to MongoDB"
    );

    let state = AppState::new(config, mongo_client);

    api::init_indexes(&state).await?;

    let router = create_router::<openapi::ApiDoc>(api::routes(&state))?;
    let app = router.merge(health_router(state.config.app));

    info!(
        port = state.config.server.port,
        operation_timeout_ms = state.config.products.operation_timeout.as_millis() as u64,
        "Starting Products API"
    );

    let mongo_client = state.mongo_client.clone();
    create_production_app(app, &state.config.server, async move {
        info!("Shutting down: closing MongoDB connections");
        mongo_client.shutdown().await;
        info!("MongoDB connection closed");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
