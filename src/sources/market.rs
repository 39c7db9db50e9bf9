// Spot price and market cap from the price index.

use super::{FetchResult, MetricSource, Reading, Target};
use crate::models::MetricId;
use crate::price_repo::PriceSource;
use async_trait::async_trait;
use std::sync::Arc;

pub struct MarketSource {
    price: Arc<dyn PriceSource>,
}

impl MarketSource {
    pub fn new(price: Arc<dyn PriceSource>) -> Self {
        Self { price }
    }
}

#[async_trait]
impl MetricSource for MarketSource {
    fn target(&self) -> Target {
        Target::Metrics(&[MetricId::Price, MetricId::MarketCap])
    }

    async fn fetch(&self) -> FetchResult {
        let quote = self.price.fetch_quote().await?;
        Ok(Reading::Values(vec![
            (MetricId::Price, quote.usd),
            (MetricId::MarketCap, quote.usd_market_cap / 1_000_000.0),
        ]))
    }
}
