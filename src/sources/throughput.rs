// Throughput and block-time estimate from two block timestamps.

use super::{FetchResult, MetricSource, Reading, SourceError, Target};
use crate::chain_repo::ChainSource;
use crate::models::MetricId;
use async_trait::async_trait;
use std::sync::Arc;

/// Blocks between the two sampled headers.
pub const LOOKBACK_BLOCKS: u64 = 10;

/// Assumed average transactions per block. This is a rough constant, not a
/// measurement; TPS is `ASSUMED_TX_PER_BLOCK / avg_block_time`.
pub const ASSUMED_TX_PER_BLOCK: f64 = 20.0;

pub struct ThroughputSource {
    chain: Arc<dyn ChainSource>,
}

impl ThroughputSource {
    pub fn new(chain: Arc<dyn ChainSource>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl MetricSource for ThroughputSource {
    fn target(&self) -> Target {
        Target::Metrics(&[MetricId::Tps, MetricId::BlockTime])
    }

    async fn fetch(&self) -> FetchResult {
        let head = self.chain.current_block_number().await?;
        let past = head.checked_sub(LOOKBACK_BLOCKS).ok_or_else(|| {
            SourceError::Derivation(format!(
                "head {head} is below the {LOOKBACK_BLOCKS}-block lookback"
            ))
        })?;
        let (latest, earlier) =
            tokio::try_join!(self.chain.get_block(head), self.chain.get_block(past))?;

        let elapsed = latest.timestamp as f64 - earlier.timestamp as f64;
        let avg_block_time = elapsed / LOOKBACK_BLOCKS as f64;
        if avg_block_time <= 0.0 {
            return Err(SourceError::Derivation(format!(
                "non-positive average block time between blocks {past} and {head}"
            )));
        }
        let tps = ASSUMED_TX_PER_BLOCK / avg_block_time;
        Ok(Reading::Values(vec![
            (MetricId::Tps, tps),
            (MetricId::BlockTime, avg_block_time),
        ]))
    }
}
