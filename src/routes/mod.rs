// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::aggregator::Aggregator;
use crate::models::DashboardEvent;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) events_tx: broadcast::Sender<DashboardEvent>,
    pub(crate) aggregator: Arc<Aggregator>,
    pub(crate) ws_dashboard_connections: Arc<AtomicUsize>,
}

pub fn app(
    events_tx: broadcast::Sender<DashboardEvent>,
    aggregator: Arc<Aggregator>,
    ws_dashboard_connections: Arc<AtomicUsize>,
) -> Router {
    let state = AppState {
        events_tx,
        aggregator,
        ws_dashboard_connections,
    };
    Router::new()
        .route("/", get(|| async { "Telos network dashboard" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/metrics", get(http::metrics_handler)) // GET /api/metrics
        .route("/ws/dashboard", get(ws::ws_dashboard)) // WS /ws/dashboard
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
