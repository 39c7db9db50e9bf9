// Renderer payloads: per-metric updates, block list, full snapshot

use serde::{Deserialize, Serialize};

use super::{BlockRow, MetricId, Status};

/// Everything a widget needs to redraw one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricUpdate {
    pub id: MetricId,
    /// Current value formatted with the metric's display precision (stale on error).
    pub value: String,
    pub status: Status,
    /// Raw series in insertion order, oldest first.
    pub series: Vec<f64>,
    /// `series` min/max-normalized into [0, 1].
    pub sparkline: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockListUpdate {
    pub status: Status,
    /// Most recent first.
    pub blocks: Vec<BlockRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DashboardEvent {
    /// Full state, sent once when a client connects.
    Snapshot(DashboardSnapshot),
    Metric(MetricUpdate),
    Blocks(BlockListUpdate),
}

/// Current state of every metric plus the block list (GET /api/metrics, WS welcome).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub metrics: Vec<MetricUpdate>,
    pub blocks: BlockListUpdate,
}
