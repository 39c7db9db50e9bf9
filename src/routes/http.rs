// GET handlers: version, api/metrics

use axum::{extract::State, response::IntoResponse};

use super::AppState;
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/metrics — current value, status and series of every metric plus the block list.
pub(super) async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.aggregator.snapshot())
}
