use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{cors_from_env, security_headers};
use axum::{Json, Router, middleware, routing::get};
use core_config::server::ServerConfig;
use std::{future::Future, io};
use tower_http::{
    compression::CompressionLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info, warn};
use utoipa::OpenApi;

/// Path the OpenAPI document is served from.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Wraps the application routes with documentation, the 404 fallback and
/// the shared middleware stack (tracing, security headers, CORS, compression).
///
/// Routes are merged at the root, so their paths are served verbatim.
/// Documentation is mounted at `/redoc`, `/rapidoc` and `/scalar`, with the
/// raw document at [`OPENAPI_JSON_PATH`].
///
/// # Errors
/// Fails when `CORS_ALLOWED_ORIGIN` is unset, empty or holds an invalid
/// origin.
pub fn create_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};

    let cors_layer = cors_from_env()?;
    let openapi = T::openapi();

    let router = Router::new()
        .route(
            OPENAPI_JSON_PATH,
            get({
                let doc = openapi.clone();
                move || {
                    let doc = doc.clone();
                    async move { Json(doc) }
                }
            }),
        )
        .merge(Redoc::with_url("/redoc", openapi.clone()))
        .merge(RapiDoc::new(OPENAPI_JSON_PATH).path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", openapi))
        .merge(apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Serves `router` until SIGINT/SIGTERM, then drains in-flight requests for
/// at most `server_config.shutdown_timeout` before running `cleanup`.
///
/// Each request is bounded by `server_config.request_timeout`.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = router.layer(TimeoutLayer::new(server_config.request_timeout));
    let coordinator = ShutdownCoordinator::new();
    let mut shutdown_rx = coordinator.subscribe();
    let drain_timeout = server_config.shutdown_timeout;

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!(address = %listener.local_addr()?, "server listening");

    let signal = coordinator.clone();
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal.wait_for_signal().await });

    let drain_deadline = async move {
        let _ = shutdown_rx.recv().await;
        tokio::time::sleep(drain_timeout).await;
    };

    let result = tokio::select! {
        result = server.into_future() => result,
        () = drain_deadline => {
            warn!(timeout = ?drain_timeout, "in-flight requests did not drain in time, forcing shutdown");
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "server encountered an error");
    }

    info!("running shutdown cleanup");
    cleanup.await;
    info!("shutdown complete");

    result
}
