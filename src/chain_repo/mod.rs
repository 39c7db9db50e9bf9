// Chain data source: EVM JSON-RPC reads (head, blocks, gas price, vault assets)

mod rpc;

pub use rpc::parse_quantity;

use crate::models::BlockSummary;
use crate::sources::SourceError;
use async_trait::async_trait;
use rpc::{RpcBlock, RpcRequest, RpcResponse, TOTAL_ASSETS_SELECTOR, block_tag};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::instrument;

/// Read-only chain capability consumed by the chain metric sources.
#[async_trait]
pub trait ChainSource: Send + Sync {
    async fn current_block_number(&self) -> Result<u64, SourceError>;

    async fn get_block(&self, number: u64) -> Result<BlockSummary, SourceError>;

    /// Gas price in base units (wei).
    async fn gas_price(&self) -> Result<u128, SourceError>;

    /// `totalAssets()` of an ERC-4626 vault, 18-decimal fixed point.
    async fn read_total_assets(&self, contract: &str) -> Result<u128, SourceError>;
}

/// HTTP JSON-RPC client for an EVM endpoint.
pub struct JsonRpcChain {
    http: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl JsonRpcChain {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Sends one request. A JSON-RPC error object becomes `SourceError::Rpc`;
    /// a body that is not a JSON-RPC response becomes `MalformedResponse`.
    async fn call(&self, method: &str, params: Value) -> Result<Value, SourceError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        let body = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let response: RpcResponse = serde_json::from_slice(&body)
            .map_err(|e| SourceError::malformed(format!("{method}: {e}")))?;
        if let Some(err) = response.error {
            return Err(SourceError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        response
            .result
            .ok_or_else(|| SourceError::malformed(format!("{method}: missing result")))
    }

    async fn call_quantity(&self, method: &str, params: Value) -> Result<u128, SourceError> {
        match self.call(method, params).await? {
            Value::String(s) => parse_quantity(&s),
            other => Err(SourceError::malformed(format!(
                "{method}: expected hex string, got {other}"
            ))),
        }
    }
}

#[async_trait]
impl ChainSource for JsonRpcChain {
    #[instrument(skip(self), fields(repo = "chain", operation = "eth_blockNumber"))]
    async fn current_block_number(&self) -> Result<u64, SourceError> {
        let n = self.call_quantity("eth_blockNumber", json!([])).await?;
        u64::try_from(n).map_err(|_| SourceError::malformed("block number out of range"))
    }

    #[instrument(skip(self), fields(repo = "chain", operation = "eth_getBlockByNumber"))]
    async fn get_block(&self, number: u64) -> Result<BlockSummary, SourceError> {
        let result = self
            .call("eth_getBlockByNumber", json!([block_tag(number), false]))
            .await?;
        if result.is_null() {
            return Err(SourceError::malformed(format!("block {number} not found")));
        }
        let block: RpcBlock = serde_json::from_value(result)
            .map_err(|e| SourceError::malformed(format!("block {number}: {e}")))?;
        block.into_summary()
    }

    #[instrument(skip(self), fields(repo = "chain", operation = "eth_gasPrice"))]
    async fn gas_price(&self) -> Result<u128, SourceError> {
        self.call_quantity("eth_gasPrice", json!([])).await
    }

    #[instrument(skip(self), fields(repo = "chain", operation = "eth_call"))]
    async fn read_total_assets(&self, contract: &str) -> Result<u128, SourceError> {
        let params = json!([{ "to": contract, "data": TOTAL_ASSETS_SELECTOR }, "latest"]);
        let result = match self.call("eth_call", params).await {
            Ok(v) => v,
            Err(SourceError::Rpc { code, message }) => {
                return Err(SourceError::ContractCall(format!(
                    "totalAssets() on {contract}: {message} (code {code})"
                )));
            }
            Err(e) => return Err(e),
        };
        let Value::String(word) = result else {
            return Err(SourceError::ContractCall(format!(
                "totalAssets() on {contract}: non-string return data"
            )));
        };
        if word == "0x" {
            return Err(SourceError::ContractCall(format!(
                "totalAssets() on {contract}: empty return data"
            )));
        }
        parse_quantity(&word)
    }
}
