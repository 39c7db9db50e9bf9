// Shared test helpers: in-memory chain/price fakes, scripted sources, recording sink

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use telos_dashboard::chain_repo::ChainSource;
use telos_dashboard::models::{BlockListUpdate, BlockSummary, DashboardEvent, MetricId, MetricUpdate};
use telos_dashboard::price_repo::{AssetQuote, PriceSource};
use telos_dashboard::render::RendererSink;
use telos_dashboard::sources::{FetchResult, MetricSource, Reading, SourceError, Target};

pub const GENESIS_TS: u64 = 1_700_000_000;

fn rpc_failure(what: &str) -> SourceError {
    SourceError::Rpc {
        code: -32000,
        message: format!("{what} unavailable"),
    }
}

/// In-memory chain. Block `n` has timestamp `GENESIS_TS + n * block_secs`.
#[derive(Default)]
pub struct FakeChain {
    pub head: Option<u64>,
    pub blocks: HashMap<u64, BlockSummary>,
    pub failing_blocks: HashSet<u64>,
    pub gas_price: Option<u128>,
    pub total_assets: Option<u128>,
    pub requested: Mutex<Vec<u64>>,
}

impl FakeChain {
    pub fn with_blocks(head: u64, block_secs: u64) -> Self {
        let first = head.saturating_sub(20);
        let blocks = (first..=head)
            .map(|n| {
                (
                    n,
                    BlockSummary {
                        number: n,
                        timestamp: GENESIS_TS + n * block_secs,
                        transaction_count: (n % 7) as u32,
                    },
                )
            })
            .collect();
        Self {
            head: Some(head),
            blocks,
            ..Default::default()
        }
    }

    pub fn requested_blocks(&self) -> Vec<u64> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainSource for FakeChain {
    async fn current_block_number(&self) -> Result<u64, SourceError> {
        self.head.ok_or_else(|| rpc_failure("head"))
    }

    async fn get_block(&self, number: u64) -> Result<BlockSummary, SourceError> {
        self.requested.lock().unwrap().push(number);
        if self.failing_blocks.contains(&number) {
            return Err(rpc_failure(&format!("block {number}")));
        }
        self.blocks
            .get(&number)
            .copied()
            .ok_or_else(|| SourceError::malformed(format!("block {number} not found")))
    }

    async fn gas_price(&self) -> Result<u128, SourceError> {
        self.gas_price.ok_or_else(|| rpc_failure("gas price"))
    }

    async fn read_total_assets(&self, contract: &str) -> Result<u128, SourceError> {
        self.total_assets
            .ok_or_else(|| SourceError::ContractCall(format!("totalAssets() on {contract} reverted")))
    }
}

pub struct FakePrice(pub Option<AssetQuote>);

#[async_trait]
impl PriceSource for FakePrice {
    async fn fetch_quote(&self) -> Result<AssetQuote, SourceError> {
        self.0
            .ok_or_else(|| SourceError::malformed("price response lacks \"telos\""))
    }
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Values(Vec<(MetricId, f64)>),
    Blocks(Vec<BlockSummary>),
    Fail,
}

/// One scripted invocation: wait `delay`, then resolve to `outcome`.
#[derive(Debug, Clone)]
pub struct Step {
    pub delay: Duration,
    pub outcome: Outcome,
}

impl Step {
    pub fn value(id: MetricId, v: f64) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Outcome::Values(vec![(id, v)]),
        }
    }

    pub fn fail() -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Outcome::Fail,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Source that plays back a script, one step per fetch (the last step repeats).
pub struct ScriptedSource {
    target: Target,
    steps: Mutex<VecDeque<Step>>,
    pub calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(target: Target, steps: Vec<Step>) -> Self {
        Self {
            target,
            steps: Mutex::new(steps.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetricSource for ScriptedSource {
    fn target(&self) -> Target {
        self.target
    }

    async fn fetch(&self) -> FetchResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = {
            let mut steps = self.steps.lock().unwrap();
            if steps.len() > 1 {
                steps.pop_front()
            } else {
                steps.front().cloned()
            }
        };
        let Some(step) = step else {
            return Err(SourceError::malformed("script exhausted"));
        };
        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
        match step.outcome {
            Outcome::Values(v) => Ok(Reading::Values(v)),
            Outcome::Blocks(b) => Ok(Reading::Blocks(b)),
            Outcome::Fail => Err(SourceError::malformed("scripted failure")),
        }
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DashboardEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<DashboardEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn metric_updates(&self) -> Vec<MetricUpdate> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                DashboardEvent::Metric(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn block_updates(&self) -> Vec<BlockListUpdate> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                DashboardEvent::Blocks(b) => Some(b),
                _ => None,
            })
            .collect()
    }
}

impl RendererSink for RecordingSink {
    fn metric_updated(&self, update: MetricUpdate) {
        self.events.lock().unwrap().push(DashboardEvent::Metric(update));
    }

    fn blocks_updated(&self, update: BlockListUpdate) {
        self.events.lock().unwrap().push(DashboardEvent::Blocks(update));
    }
}
