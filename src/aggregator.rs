// Fetch-cycle orchestration: fan out to every source, isolate failures,
// update per-metric state, then notify the renderer.
//
// Each metric sits behind its own mutex and an update is a single
// append + status write under that lock, so overlapping cycles cannot
// interleave partial updates. Across overlapping cycles the last result to
// arrive wins, even if it came from the older cycle.

use crate::models::{
    BlockListUpdate, BlockSummary, DashboardSnapshot, MetricId, MetricUpdate, Status,
};
use crate::render::{RendererSink, block_rows};
use crate::series::{TimeSeriesBuffer, normalize};
use crate::sources::{FetchResult, Reading, SourceRegistry, Target};
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, instrument, warn};

/// State of one tracked metric.
#[derive(Debug, Clone)]
pub struct Metric {
    id: MetricId,
    series: TimeSeriesBuffer,
    current: f64,
    status: Status,
}

impl Metric {
    pub fn new(id: MetricId, capacity: usize) -> Self {
        Self {
            id,
            series: TimeSeriesBuffer::new(capacity),
            current: id.initial_value(),
            status: Status::Unknown,
        }
    }

    /// Stores the value as displayed: rounded to the metric's precision, then re-parsed.
    fn record_success(&mut self, raw: f64) {
        let shown = self.id.format(raw).parse::<f64>().unwrap_or(0.0);
        self.series.append(shown);
        self.current = shown;
        self.status = Status::Success;
    }

    fn record_error(&mut self) {
        self.status = Status::Error;
    }

    pub fn id(&self) -> MetricId {
        self.id
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn series(&self) -> &TimeSeriesBuffer {
        &self.series
    }

    pub fn to_update(&self) -> MetricUpdate {
        let series = self.series.to_vec();
        MetricUpdate {
            id: self.id,
            value: self.id.format(self.current),
            status: self.status,
            sparkline: normalize(&series),
            series,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct BlockList {
    blocks: Vec<BlockSummary>,
    status: Status,
}

/// Per-metric outcome of one cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub metrics: BTreeMap<MetricId, Status>,
    /// `None` when no source feeds the block list.
    pub blocks: Option<Status>,
}

impl CycleReport {
    pub fn succeeded(&self) -> usize {
        self.metrics
            .values()
            .filter(|s| **s == Status::Success)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.metrics
            .values()
            .filter(|s| **s == Status::Error)
            .count()
    }
}

pub struct Aggregator {
    registry: SourceRegistry,
    metrics: BTreeMap<MetricId, Mutex<Metric>>,
    blocks: Mutex<BlockList>,
    sink: Arc<dyn RendererSink>,
}

impl Aggregator {
    /// Creates one metric (empty series, status Unknown) per metric the registry feeds.
    pub fn new(registry: SourceRegistry, capacity: usize, sink: Arc<dyn RendererSink>) -> Self {
        let metrics = registry
            .metric_ids()
            .into_iter()
            .map(|id| (id, Mutex::new(Metric::new(id, capacity))))
            .collect();
        Self {
            registry,
            metrics,
            blocks: Mutex::new(BlockList::default()),
            sink,
        }
    }

    /// Runs every source concurrently and applies each outcome as it arrives.
    /// Never fails: source errors become `Status::Error` and a log line.
    #[instrument(skip(self), fields(sources = self.registry.len()))]
    pub async fn run_cycle(&self) -> CycleReport {
        let mut pending: FuturesUnordered<_> = self
            .registry
            .iter()
            .map(|(name, source)| async move { (name, source.target(), source.fetch().await) })
            .collect();

        let mut report = CycleReport::default();
        while let Some((name, target, result)) = pending.next().await {
            self.apply(name, target, result, &mut report);
        }

        // Build every update before notifying: the sink may read back into the aggregator.
        let updates: Vec<MetricUpdate> = report
            .metrics
            .keys()
            .filter_map(|id| self.metrics.get(id))
            .map(|metric| lock(metric).to_update())
            .collect();
        for update in updates {
            self.sink.metric_updated(update);
        }
        if report.blocks.is_some() {
            self.sink.blocks_updated(self.block_list_update());
        }

        debug!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            blocks = ?report.blocks,
            "cycle complete"
        );
        report
    }

    fn apply(
        &self,
        source: &'static str,
        target: Target,
        result: FetchResult,
        report: &mut CycleReport,
    ) {
        match (target, result) {
            (Target::Metrics(ids), Ok(Reading::Values(values))) => {
                let mut seen = BTreeSet::new();
                for (id, value) in values {
                    if !ids.contains(&id) {
                        warn!(source, metric = %id, "source returned a metric it does not feed");
                        continue;
                    }
                    if seen.contains(&id) {
                        warn!(source, metric = %id, "duplicate reading ignored");
                        continue;
                    }
                    if !value.is_finite() {
                        warn!(source, metric = %id, value, "non-finite reading discarded");
                        continue;
                    }
                    if let Some(metric) = self.metrics.get(&id) {
                        lock(metric).record_success(value);
                        report.metrics.insert(id, Status::Success);
                        seen.insert(id);
                    }
                }
                for id in ids.iter().filter(|id| !seen.contains(*id)) {
                    warn!(source, metric = %id, "reading missing from source result");
                    self.mark_error(*id, report);
                }
            }
            (Target::Blocks, Ok(Reading::Blocks(blocks))) => {
                let mut list = lock(&self.blocks);
                list.blocks = blocks;
                list.status = Status::Success;
                report.blocks = Some(Status::Success);
            }
            (target, Ok(_)) => {
                warn!(source, ?target, "reading does not match source target");
                self.mark_target_error(target, report);
            }
            (target, Err(e)) => {
                warn!(source, error = %e, kind = e.kind(), "fetch failed");
                self.mark_target_error(target, report);
            }
        }
    }

    fn mark_target_error(&self, target: Target, report: &mut CycleReport) {
        match target {
            Target::Metrics(ids) => {
                for id in ids {
                    self.mark_error(*id, report);
                }
            }
            Target::Blocks => {
                lock(&self.blocks).status = Status::Error;
                report.blocks = Some(Status::Error);
            }
        }
    }

    fn mark_error(&self, id: MetricId, report: &mut CycleReport) {
        if let Some(metric) = self.metrics.get(&id) {
            lock(metric).record_error();
            report.metrics.insert(id, Status::Error);
        }
    }

    /// Copy of one metric's state.
    pub fn metric(&self, id: MetricId) -> Option<Metric> {
        self.metrics.get(&id).map(|m| lock(m).clone())
    }

    pub fn metric_update(&self, id: MetricId) -> Option<MetricUpdate> {
        self.metrics.get(&id).map(|m| lock(m).to_update())
    }

    pub fn blocks(&self) -> Vec<BlockSummary> {
        lock(&self.blocks).blocks.clone()
    }

    pub fn block_list_update(&self) -> BlockListUpdate {
        let list = lock(&self.blocks);
        BlockListUpdate {
            status: list.status,
            blocks: block_rows(&list.blocks, chrono::Utc::now().timestamp()),
        }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            metrics: self.metrics.values().map(|m| lock(m).to_update()).collect(),
            blocks: self.block_list_update(),
        }
    }
}

/// Metric writes are single assignments, so a poisoned lock still holds consistent state.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
