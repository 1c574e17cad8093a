//! HTTP surface built on axum.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::app::context::ServiceContext;
use crate::domain::ServeConfig;
use crate::error::AppError;

pub mod routes;

/// Build the application router around a loaded context.
pub fn router(ctx: Arc<ServiceContext>) -> Router {
    // The dashboard is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::liveness))
        .route("/health/live", get(routes::liveness))
        .route("/health/ready", get(routes::readiness))
        .route("/predict", post(routes::predict))
        .route("/api/load-data", get(routes::load_data))
        .route("/api/load-data/monthly", get(routes::monthly))
        .route("/api/load-data/weekly", get(routes::weekly))
        .route("/api/load-data/stats", get(routes::stats))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(ctx)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &ServeConfig, ctx: Arc<ServiceContext>) -> Result<(), AppError> {
    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::config(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("demand-api v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
