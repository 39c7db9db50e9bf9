//! Metric sources: one async fetch per tracked quantity.
//!
//! Every source is registered in a [`SourceRegistry`] under a stable name and
//! declares which metrics (or the recent-block list) its readings feed. The
//! aggregator only sees the [`MetricSource`] trait, so adding a metric means
//! registering a new source.

mod blocks;
mod chain;
mod error;
mod fixed;
mod market;
mod throughput;

pub use blocks::{RECENT_BLOCKS, RecentBlocksSource};
pub use chain::{GasPriceSource, StakedSupplySource};
pub use error::SourceError;
pub use fixed::ValidatorCountSource;
pub use market::MarketSource;
pub use throughput::{ASSUMED_TX_PER_BLOCK, LOOKBACK_BLOCKS, ThroughputSource};

use crate::chain_repo::ChainSource;
use crate::models::{BlockSummary, MetricId};
use crate::price_repo::PriceSource;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Successful reading of one source.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    /// Raw (unrounded) values, one per fed metric.
    Values(Vec<(MetricId, f64)>),
    /// Most recent first; replaces the previous list wholesale.
    Blocks(Vec<BlockSummary>),
}

/// Outcome of one source invocation.
pub type FetchResult = Result<Reading, SourceError>;

/// What a source's readings update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Metrics(&'static [MetricId]),
    Blocks,
}

#[async_trait]
pub trait MetricSource: Send + Sync {
    fn target(&self) -> Target;

    async fn fetch(&self) -> FetchResult;
}

/// Sources keyed by name. A metric can be fed by at most one source.
#[derive(Default)]
pub struct SourceRegistry {
    sources: BTreeMap<&'static str, Arc<dyn MetricSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: &'static str,
        source: Arc<dyn MetricSource>,
    ) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.sources.contains_key(name),
            "source {name:?} already registered"
        );
        for (other, existing) in &self.sources {
            match (existing.target(), source.target()) {
                (Target::Blocks, Target::Blocks) => {
                    anyhow::bail!("block list already fed by source {other:?}")
                }
                (Target::Metrics(a), Target::Metrics(b)) => {
                    if let Some(id) = b.iter().find(|id| a.contains(*id)) {
                        anyhow::bail!("metric {id} already fed by source {other:?}");
                    }
                }
                _ => {}
            }
        }
        self.sources.insert(name, source);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Arc<dyn MetricSource>)> {
        self.sources.iter().map(|(name, s)| (*name, s))
    }

    /// Every metric fed by a registered source.
    pub fn metric_ids(&self) -> Vec<MetricId> {
        let mut ids: Vec<MetricId> = self
            .sources
            .values()
            .filter_map(|s| match s.target() {
                Target::Metrics(ids) => Some(ids.iter().copied()),
                Target::Blocks => None,
            })
            .flatten()
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Inputs for the standard set of dashboard sources.
pub struct DashboardSources {
    pub chain: Arc<dyn ChainSource>,
    pub price: Arc<dyn PriceSource>,
    pub staked_contract: String,
    pub validator_count: u32,
}

/// Registers the six dashboard sources.
pub fn dashboard_registry(deps: DashboardSources) -> anyhow::Result<SourceRegistry> {
    let DashboardSources {
        chain,
        price,
        staked_contract,
        validator_count,
    } = deps;
    let mut registry = SourceRegistry::new();
    registry.register("throughput", Arc::new(ThroughputSource::new(chain.clone())))?;
    registry.register("gas_price", Arc::new(GasPriceSource::new(chain.clone())))?;
    registry.register("market", Arc::new(MarketSource::new(price)))?;
    registry.register(
        "staked_supply",
        Arc::new(StakedSupplySource::new(chain.clone(), staked_contract)),
    )?;
    registry.register("recent_blocks", Arc::new(RecentBlocksSource::new(chain)))?;
    registry.register(
        "validators",
        Arc::new(ValidatorCountSource::new(validator_count)),
    )?;
    Ok(registry)
}
