//! Recoverable scan errors
//!
//! None of these escape the component that raises them: a failed chain is
//! recorded as empty, a failed block is skipped, a failed field read falls
//! back to its default. They exist so the skip/default decisions are logged
//! with a reason instead of a bare string.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// Endpoint unreachable or liveness check failed
    #[error("connection to {chain} failed: {reason}")]
    Connection { chain: String, reason: String },

    /// Endpoint answered with a different chain id than configured
    #[error("{chain}: expected chain id {expected}, endpoint reports {actual}")]
    ChainIdMismatch {
        chain: String,
        expected: u64,
        actual: u64,
    },

    #[error("unsupported chain: {0}")]
    UnknownChain(String),

    /// Fetching or decoding one block failed
    #[error("block {block}: {reason}")]
    BlockProcessing { block: u64, reason: String },

    /// Failure outside the per-generation guards of the liquidity probe
    #[error("liquidity probe failed: {0}")]
    Probe(String),

    /// Market-data transport / HTTP failure
    #[error("market data fetch failed: {0}")]
    Fetch(String),

    /// One ERC-20 metadata field could not be read
    #[error("{field}() read failed: {reason}")]
    FieldRead { field: &'static str, reason: String },
}

impl ScanError {
    pub fn field(field: &'static str, reason: impl ToString) -> Self {
        Self::FieldRead {
            field,
            reason: reason.to_string(),
        }
    }
}
