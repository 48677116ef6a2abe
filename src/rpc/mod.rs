//! Chain endpoint access
//!
//! Everything the scanner needs from a node goes through [`ChainRpc`]:
//! liveness checks, blocks with full transaction bodies, receipts and
//! read-only `eth_call`. The alloy-backed implementation lives in
//! `alloy_rpc`; tests use the in-memory `mock`.

mod alloy_rpc;
mod session;

#[cfg(test)]
pub(crate) mod mock;

pub use alloy_rpc::{AlloyConnector, AlloyRpc};
pub use session::{select, ChainSession};

use alloy_primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;

use crate::chains::ChainConfig;

/// A transaction as seen by the scanner
#[derive(Debug, Clone)]
pub struct BlockTransaction {
    pub hash: TxHash,
    pub from: Address,
    /// `None` for contract-creation transactions
    pub to: Option<Address>,
}

impl BlockTransaction {
    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }
}

/// A block with its transactions in execution order
#[derive(Debug, Clone)]
pub struct ScannedBlock {
    pub number: u64,
    /// Unix seconds
    pub timestamp: u64,
    pub transactions: Vec<BlockTransaction>,
}

/// Read-only access to one network's RPC service
#[async_trait]
pub trait ChainRpc: Send + Sync {
    async fn block_number(&self) -> Result<u64>;

    async fn chain_id(&self) -> Result<u64>;

    /// Fetch a block including full transaction bodies
    async fn block_with_transactions(&self, number: u64) -> Result<ScannedBlock>;

    /// `contractAddress` from the transaction receipt
    async fn contract_address(&self, tx_hash: TxHash) -> Result<Option<Address>>;

    /// `eth_call` against the latest block
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes>;
}

/// Opens endpoints for chains
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, chain: &ChainConfig) -> Result<Arc<dyn ChainRpc>>;
}
