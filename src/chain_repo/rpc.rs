// JSON-RPC wire types and hex quantity decoding.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::BlockSummary;
use crate::sources::SourceError;

/// `totalAssets()` selector (first 4 bytes of its keccak-256 hash).
pub(crate) const TOTAL_ASSETS_SELECTOR: &str = "0x01e1d114";

#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse {
    /// `Some(Value::Null)` for an explicit `"result": null`, `None` when absent.
    #[serde(default, deserialize_with = "present")]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

fn present<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(d).map(Some)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// Subset of an `eth_getBlockByNumber` result (transactions as hashes).
#[derive(Debug, Deserialize)]
pub(crate) struct RpcBlock {
    pub number: String,
    pub timestamp: String,
    #[serde(default)]
    pub transactions: Vec<Value>,
}

impl RpcBlock {
    pub fn into_summary(self) -> Result<BlockSummary, SourceError> {
        let number = parse_u64(&self.number, "block.number")?;
        let timestamp = parse_u64(&self.timestamp, "block.timestamp")?;
        let transaction_count = u32::try_from(self.transactions.len())
            .map_err(|_| SourceError::malformed("block.transactions too long"))?;
        Ok(BlockSummary {
            number,
            timestamp,
            transaction_count,
        })
    }
}

/// Decodes a `0x`-prefixed hex quantity. Leading zeros are accepted so that
/// 32-byte `eth_call` words decode too, as long as the value fits in 128 bits.
pub fn parse_quantity(s: &str) -> Result<u128, SourceError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| SourceError::malformed(format!("quantity {s:?} lacks 0x prefix")))?;
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return if digits.is_empty() {
            Err(SourceError::malformed("empty quantity"))
        } else {
            Ok(0)
        };
    }
    if significant.len() > 32 {
        return Err(SourceError::malformed(format!(
            "quantity {s:?} exceeds 128 bits"
        )));
    }
    u128::from_str_radix(significant, 16)
        .map_err(|e| SourceError::malformed(format!("quantity {s:?}: {e}")))
}

fn parse_u64(s: &str, field: &str) -> Result<u64, SourceError> {
    let v = parse_quantity(s)?;
    u64::try_from(v).map_err(|_| SourceError::malformed(format!("{field} out of range: {s}")))
}

pub(crate) fn block_tag(number: u64) -> String {
    format!("{number:#x}")
}
