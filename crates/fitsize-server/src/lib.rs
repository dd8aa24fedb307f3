//! fitsize HTTP upload service (Axum).
//!
//! `POST /api/compress` takes a multipart upload (`file`, `targetSize`) and
//! answers with the compressed bytes; `GET /health` reports liveness.

pub mod cli;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

use axum::Router;
use state::AppState;

/// Build the application router with default options.
pub fn app() -> Router {
    app_with_state(AppState::default())
}

/// Build the application router with a custom state.
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::compress_routes(state.max_upload_bytes))
        .with_state(state)
}
