//! # Axum Helpers
//!
//! Shared HTTP plumbing for the services in this workspace.
//!
//! - **[`server`]**: router assembly with OpenAPI docs, liveness routes, graceful shutdown
//! - **[`http`]**: CORS and security-header middleware
//! - **[`errors`]**: [`AppError`] and the error envelope with stable [`ErrorCode`]s
//! - **[`response`]**: the success envelope [`ApiResponse`]
//! - **[`extractors`]**: [`LenientJson`], a body extractor that never rejects
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::{app_info, server::ServerConfig};
//!
//! let router = create_router::<ApiDoc>(api_routes)?.merge(health_router(app_info!()));
//! create_production_app(router, &ServerConfig::default(), async {}).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod response;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::LenientJson;
pub use http::{create_cors_layer, security_headers};
pub use response::{ApiResponse, Pagination};
pub use server::{
    HealthResponse, ShutdownCoordinator, create_production_app, create_router, health_router,
};
