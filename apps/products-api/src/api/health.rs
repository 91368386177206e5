//! Readiness endpoint; liveness routes come from `axum_helpers::health_router`.

use axum::{extract::State, routing::get, Router};
use axum_helpers::{errors::responses::ServiceUnavailableResponse, ApiResponse, AppError};
use database::mongodb::check_health_detailed;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub database: String,
    pub response_time_ms: u64,
}

/// Check that MongoDB answers a ping
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Database reachable", body = ApiResponse<ReadinessResponse>),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
pub async fn ready(
    State(state): State<AppState>,
) -> Result<ApiResponse<ReadinessResponse>, AppError> {
    let health = check_health_detailed(&state.mongo_client).await;

    if !health.healthy {
        tracing::warn!(
            error = health.message.as_deref().unwrap_or("unknown"),
            response_time_ms = health.response_time_ms,
            "readiness check failed"
        );
        return Err(AppError::ServiceUnavailable(
            "database unreachable".to_string(),
        ));
    }

    Ok(ApiResponse::ok(ReadinessResponse {
        status: "ready".to_string(),
        database: state.config.mongodb.database().to_string(),
        response_time_ms: health.response_time_ms,
    }))
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ProductsConfig};
    use axum::{body::Body, http::StatusCode};
    use core_config::{app_info, server::ServerConfig, Environment};
    use database::mongodb::MongoConfig;
    use http_body_util::BodyExt;
    use mongodb::Client;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_ready_is_503_when_database_is_unreachable() {
        // Nothing listens on port 1; server selection gives up quickly.
        let url = "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200&connectTimeoutMS=200";
        let mongo_client = Client::with_uri_str(url).await.unwrap();
        let config = Config {
            app: app_info!(),
            mongodb: MongoConfig::new(url),
            server: ServerConfig::default(),
            products: ProductsConfig::default(),
            environment: Environment::Development,
        };
        let state = AppState::new(config, mongo_client);

        let response = router(state)
            .oneshot(
                axum::http::Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error_code"], "SERVICE_UNAVAILABLE");
        assert_eq!(body["data"], serde_json::Value::Null);
    }
}
