// WebSocket handler: snapshot on connect, then live dashboard events

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tokio::time::{Duration, Instant, timeout};

use super::AppState;
use crate::aggregator::Aggregator;
use crate::models::DashboardEvent;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Decrements the dashboard connection count on drop (connect = +1, drop = -1).
struct WsDashboardGuard(Arc<AtomicUsize>);

impl Drop for WsDashboardGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, std::sync::atomic::Ordering::Relaxed);
    }
}

pub(super) async fn ws_dashboard(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let tx = state.events_tx.clone();
    let conn_count = state.ws_dashboard_connections.clone();
    let aggregator = state.aggregator.clone();
    ws.on_upgrade(move |socket| async move {
        // Subscribe before taking the snapshot so no update falls in between.
        let mut rx = tx.subscribe();
        if let Err(e) = stream_dashboard(socket, &mut rx, conn_count, aggregator).await {
            tracing::info!("Dashboard stream error: {}", e);
        }
    })
}

async fn send_text(socket: &mut WebSocket, json: String) -> bool {
    matches!(
        timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await,
        Ok(Ok(()))
    )
}

async fn stream_dashboard(
    mut socket: WebSocket,
    rx: &mut broadcast::Receiver<DashboardEvent>,
    conn_count: Arc<AtomicUsize>,
    aggregator: Arc<Aggregator>,
) -> anyhow::Result<()> {
    let clients = conn_count.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1;
    let _guard = WsDashboardGuard(conn_count);
    tracing::info!(ws_dashboard_clients = clients, "Client connected to dashboard stream");

    let welcome = DashboardEvent::Snapshot(aggregator.snapshot());
    if !send_text(&mut socket, serde_json::to_string(&welcome)?).await {
        return Ok(());
    }

    let mut ping_interval =
        tokio::time::interval_at(Instant::now() + WS_PING_INTERVAL, WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        if !send_text(&mut socket, serde_json::to_string(&event)?).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("WebSocket /ws/dashboard client lagged, skipped {} messages", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if !matches!(r, Ok(Ok(()))) {
                    break;
                }
            }
        }
    }
    Ok(())
}
