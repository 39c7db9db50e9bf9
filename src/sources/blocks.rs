// Recent blocks: head and the blocks just below it, fetched one by one.

use super::{FetchResult, MetricSource, Reading, SourceError, Target};
use crate::chain_repo::ChainSource;
use async_trait::async_trait;
use std::sync::Arc;

pub const RECENT_BLOCKS: u64 = 5;

pub struct RecentBlocksSource {
    chain: Arc<dyn ChainSource>,
}

impl RecentBlocksSource {
    pub fn new(chain: Arc<dyn ChainSource>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl MetricSource for RecentBlocksSource {
    fn target(&self) -> Target {
        Target::Blocks
    }

    /// Any failed block read fails the whole list.
    async fn fetch(&self) -> FetchResult {
        let head = self.chain.current_block_number().await?;
        if head < RECENT_BLOCKS - 1 {
            return Err(SourceError::Derivation(format!(
                "chain head {head} has fewer than {RECENT_BLOCKS} blocks"
            )));
        }
        let mut blocks = Vec::with_capacity(RECENT_BLOCKS as usize);
        for offset in 0..RECENT_BLOCKS {
            blocks.push(self.chain.get_block(head - offset).await?);
        }
        Ok(Reading::Blocks(blocks))
    }
}
