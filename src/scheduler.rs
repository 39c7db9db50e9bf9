// Fixed-cadence cycle trigger.
// Each tick spawns a detached cycle, so the period is start-to-start and a
// slow cycle can overlap the next one. Stopping halts future ticks only;
// cycles already running finish and apply their results.

use crate::aggregator::Aggregator;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Duration, interval};

/// Scheduler timing config.
pub struct SchedulerConfig {
    /// Start-to-start period between cycles. The first cycle starts immediately.
    /// Zero is treated as 1 ms.
    pub interval_ms: u64,
}

/// Running scheduler. Dropping it without `stop` leaves the trigger loop running.
pub struct SchedulerHandle {
    shutdown_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
    cycles_started: Arc<AtomicU64>,
}

impl SchedulerHandle {
    /// Number of cycles triggered so far.
    pub fn cycles_started(&self) -> u64 {
        self.cycles_started.load(Ordering::Relaxed)
    }

    /// Halts future triggers and waits for the trigger loop to exit.
    /// In-flight cycles are not aborted.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.join.await {
            tracing::warn!(error = %e, "scheduler task ended abnormally");
        }
    }
}

pub fn spawn(aggregator: Arc<Aggregator>, config: SchedulerConfig) -> SchedulerHandle {
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
    let cycles_started = Arc::new(AtomicU64::new(0));
    let counter = cycles_started.clone();
    let SchedulerConfig { interval_ms } = config;

    let join = tokio::spawn(async move {
        let mut tick = interval(Duration::from_millis(interval_ms.max(1)));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        tracing::info!(interval_ms, "scheduler started");

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let cycle = counter.fetch_add(1, Ordering::Relaxed) + 1;
                    let aggregator = aggregator.clone();
                    tokio::spawn(async move {
                        let report = aggregator.run_cycle().await;
                        tracing::debug!(
                            cycle,
                            succeeded = report.succeeded(),
                            failed = report.failed(),
                            "cycle applied"
                        );
                    });
                }
                _ = &mut shutdown_rx => {
                    tracing::info!(cycles = counter.load(Ordering::Relaxed), "scheduler stopping");
                    break;
                }
            }
        }
    });

    SchedulerHandle {
        shutdown_tx,
        join,
        cycles_started,
    }
}
