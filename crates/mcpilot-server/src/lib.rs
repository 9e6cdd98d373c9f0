//! MCPilot local config writer.
//!
//! Serves the browser UI's static files and a small JSON API that writes the
//! clean config to desktop-client config paths with backup rotation.

pub mod cors;
pub mod routes;
pub mod state;
pub mod static_files;

use std::future::Future;

use anyhow::Context;
use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tokio::net::TcpListener;

pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(routes::status))
        .route("/api/hostname", get(routes::hostname))
        .route(
            "/api/settings",
            get(routes::get_settings).post(routes::update_settings),
        )
        .route("/api/save-config", post(routes::save_config))
        .route("/", get(static_files::index))
        .route("/*path", get(static_files::asset))
        .layer(middleware::from_fn(cors::cors))
        .with_state(state)
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")
}
