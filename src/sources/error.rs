// Fetch failure taxonomy shared by all metric sources and their data repos

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    /// Endpoint unreachable, timed out, or answered with a non-2xx status.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("contract call failed: {0}")]
    ContractCall(String),
    /// The readings arrived but no meaningful value can be derived from them.
    #[error("cannot derive value: {0}")]
    Derivation(String),
}

impl SourceError {
    pub fn malformed(detail: impl Into<String>) -> Self {
        SourceError::MalformedResponse(detail.into())
    }

    /// Short machine-friendly classification for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::Network(_) => "network",
            SourceError::Rpc { .. } => "rpc",
            SourceError::MalformedResponse(_) => "malformed_response",
            SourceError::ContractCall(_) => "contract_call",
            SourceError::Derivation(_) => "derivation",
        }
    }
}
