// Price index source: one HTTP GET returning `{ "<asset>": { "usd": .., "usd_market_cap": .. } }`

use crate::sources::SourceError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::instrument;

/// Spot quote for the tracked asset, in USD.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AssetQuote {
    pub usd: f64,
    pub usd_market_cap: f64,
}

#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_quote(&self) -> Result<AssetQuote, SourceError>;
}

pub struct HttpPriceIndex {
    http: reqwest::Client,
    url: String,
    asset: String,
}

impl HttpPriceIndex {
    pub fn new(
        url: impl Into<String>,
        asset: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
            asset: asset.into(),
        })
    }
}

#[async_trait]
impl PriceSource for HttpPriceIndex {
    #[instrument(skip(self), fields(repo = "price", asset = %self.asset))]
    async fn fetch_quote(&self) -> Result<AssetQuote, SourceError> {
        let body = self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| SourceError::malformed(format!("price response: {e}")))?;
        extract_quote(value, &self.asset)
    }
}

/// Picks the asset entry out of a price-index response. A missing asset key is
/// a malformed response, not a transport failure.
pub fn extract_quote(mut response: Value, asset: &str) -> Result<AssetQuote, SourceError> {
    let entry = response
        .get_mut(asset)
        .map(Value::take)
        .ok_or_else(|| SourceError::malformed(format!("price response lacks {asset:?}")))?;
    serde_json::from_value(entry)
        .map_err(|e| SourceError::malformed(format!("price entry for {asset:?}: {e}")))
}
