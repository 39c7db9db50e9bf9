// Renderer side: sink contract, broadcast sink, and widget helpers
// (age labels, sparkline geometry, grouped block numbers).

use crate::models::{BlockListUpdate, BlockRow, BlockSummary, DashboardEvent, MetricUpdate};
use crate::series::normalize;
use std::sync::Mutex;
use tokio::sync::broadcast;
use tokio::time::{Duration, Instant};

/// Rate limit for the "no receivers" message (avoid logging every cycle when no one is on /ws/dashboard)
const NO_RECEIVERS_WARN_INTERVAL: Duration = Duration::from_secs(60);

/// Receives already-computed values after each cycle.
pub trait RendererSink: Send + Sync {
    fn metric_updated(&self, update: MetricUpdate);

    fn blocks_updated(&self, update: BlockListUpdate);
}

/// Publishes every update on a broadcast channel consumed by WebSocket clients.
pub struct BroadcastSink {
    tx: broadcast::Sender<DashboardEvent>,
    last_no_receivers_warn: Mutex<Option<Instant>>,
}

impl BroadcastSink {
    pub fn new(tx: broadcast::Sender<DashboardEvent>) -> Self {
        Self {
            tx,
            last_no_receivers_warn: Mutex::new(None),
        }
    }

    fn publish(&self, event: DashboardEvent) {
        if self.tx.send(event).is_err() {
            let mut last = self
                .last_no_receivers_warn
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if last.is_none_or(|t| t.elapsed() >= NO_RECEIVERS_WARN_INTERVAL) {
                tracing::debug!(
                    operation = "broadcast_update",
                    "No active WebSocket clients; broadcast channel has no receivers"
                );
                *last = Some(Instant::now());
            }
        }
    }
}

impl RendererSink for BroadcastSink {
    fn metric_updated(&self, update: MetricUpdate) {
        self.publish(DashboardEvent::Metric(update));
    }

    fn blocks_updated(&self, update: BlockListUpdate) {
        self.publish(DashboardEvent::Blocks(update));
    }
}

/// Relative age of a block: `Ns ago` under a minute, `Nm ago` under an hour,
/// `Nh ago` beyond. Units are floored. Future timestamps read as `0s ago`.
pub fn age_label(age_secs: i64) -> String {
    let age = age_secs.max(0);
    if age < 60 {
        format!("{age}s ago")
    } else if age < 3600 {
        format!("{}m ago", age / 60)
    } else {
        format!("{}h ago", age / 3600)
    }
}

/// Presentation rows for the recent-blocks list, ages relative to `now_secs`.
pub fn block_rows(blocks: &[BlockSummary], now_secs: i64) -> Vec<BlockRow> {
    blocks
        .iter()
        .map(|b| BlockRow {
            number: b.number,
            number_label: format!("#{}", group_thousands(&b.number.to_string())),
            age_label: age_label(
                now_secs.saturating_sub(i64::try_from(b.timestamp).unwrap_or(i64::MAX)),
            ),
            transaction_count: b.transaction_count,
        })
        .collect()
}

/// Line geometry for a sparkline of `width` x `height` (y grows downwards).
/// Fewer than two samples draw nothing. The server only ships the normalized
/// series; this is the layout step for renderers that draw from it.
pub fn sparkline_points(values: &[f64], width: f64, height: f64) -> Vec<(f64, f64)> {
    if values.len() < 2 {
        return Vec::new();
    }
    let last = (values.len() - 1) as f64;
    normalize(values)
        .into_iter()
        .enumerate()
        .map(|(i, n)| (i as f64 / last * width, height - n * height))
        .collect()
}

/// Inserts comma thousands separators into a run of ASCII digits.
pub fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
