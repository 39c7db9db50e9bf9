// Recent-block records

use serde::{Deserialize, Serialize};

/// One chain block as read from the RPC endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSummary {
    pub number: u64,
    /// Unix seconds.
    pub timestamp: u64,
    pub transaction_count: u32,
}

/// A block as presented in the recent-blocks list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRow {
    pub number: u64,
    /// e.g. `#12,345,678`
    pub number_label: String,
    /// e.g. `5s ago`, `3m ago`, `2h ago`
    pub age_label: String,
    pub transaction_count: u32,
}
