// Gas price and staked supply: single chain reads with unit scaling.

use super::{FetchResult, MetricSource, Reading, Target};
use crate::chain_repo::ChainSource;
use crate::models::MetricId;
use async_trait::async_trait;
use std::sync::Arc;

const WEI_PER_GWEI: f64 = 1e9;
/// 18-decimal fixed point to millions of tokens.
const FIXED_POINT_PER_MILLION: f64 = 1e24;

pub struct GasPriceSource {
    chain: Arc<dyn ChainSource>,
}

impl GasPriceSource {
    pub fn new(chain: Arc<dyn ChainSource>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl MetricSource for GasPriceSource {
    fn target(&self) -> Target {
        Target::Metrics(&[MetricId::GasPrice])
    }

    async fn fetch(&self) -> FetchResult {
        let wei = self.chain.gas_price().await?;
        Ok(Reading::Values(vec![(
            MetricId::GasPrice,
            wei as f64 / WEI_PER_GWEI,
        )]))
    }
}

/// Total assets of the staking vault, in millions.
pub struct StakedSupplySource {
    chain: Arc<dyn ChainSource>,
    contract: String,
}

impl StakedSupplySource {
    pub fn new(chain: Arc<dyn ChainSource>, contract: impl Into<String>) -> Self {
        Self {
            chain,
            contract: contract.into(),
        }
    }
}

#[async_trait]
impl MetricSource for StakedSupplySource {
    fn target(&self) -> Target {
        Target::Metrics(&[MetricId::Staked])
    }

    async fn fetch(&self) -> FetchResult {
        let assets = self.chain.read_total_assets(&self.contract).await?;
        Ok(Reading::Values(vec![(
            MetricId::Staked,
            assets as f64 / FIXED_POINT_PER_MILLION,
        )]))
    }
}
