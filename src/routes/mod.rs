//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the table-list endpoints and a health probe under one Axum router.
//! When a static directory is configured it is served as the fallback, which
//! keeps the host page, the widget's wasm package and the endpoints on one
//! origin so the widget's same-origin requests carry the session cookie.

pub mod tables;

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/tables/reserved", get(tables::reserved))
        .route("/tables/all", get(tables::all))
        .route("/healthz", get(healthz))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "serving static files");
            router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true))
        }
        None => router,
    };

    router
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
