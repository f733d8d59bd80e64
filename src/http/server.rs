//! Router and server lifecycle

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::catalog::Catalog;
use crate::http::handlers;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Read-only release table, built once at startup
    pub catalog: Arc<Catalog>,
    /// Whether GET queries are answered
    pub allow_get: bool,
}

impl AppState {
    pub fn new(catalog: Catalog, allow_get: bool) -> Self {
        Self {
            catalog: Arc::new(catalog),
            allow_get,
        }
    }
}

/// Build the version check router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/check",
            post(handlers::check_form).get(handlers::check_query),
        )
        .route("/api/check", post(handlers::check_json))
        .route("/version", get(handlers::legacy_version))
        .route(
            "/program",
            post(handlers::program_form).get(handlers::program_query),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server on the given address and run until Ctrl-C.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let programs = state.catalog.len();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "version-check listening on {} with {} programs",
        listener.local_addr()?,
        programs
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("version-check stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
