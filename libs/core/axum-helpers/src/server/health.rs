use axum::{Router, extract::State, routing::get};
use core_config::AppInfo;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::response::ApiResponse;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub name: String,
    pub version: String,
}

async fn root(State(app): State<AppInfo>) -> ApiResponse<String> {
    ApiResponse::ok(format!("Welcome to {}", app.name))
}

async fn ping() -> ApiResponse<&'static str> {
    ApiResponse::ok("pong")
}

async fn health(State(app): State<AppInfo>) -> ApiResponse<HealthResponse> {
    ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        name: app.name.to_string(),
        version: app.version.to_string(),
    })
}

/// Liveness routes: `/`, `/ping` and `/health`. They never touch
/// dependencies; readiness belongs to the application.
pub fn health_router(app_info: AppInfo) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/ping", get(ping))
        .route("/health", get(health))
        .with_state(app_info)
}
