//! HTTP JSON-RPC endpoint built on alloy's provider
//!
//! Every request is bounded by the configured timeout; a timeout surfaces
//! as an ordinary error so callers can skip the block / field / chain.

use alloy_eips::BlockNumberOrTag;
use alloy_network::{Ethereum, TransactionResponse};
use alloy_primitives::{Address, Bytes, TxHash};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types::{BlockTransactions, TransactionRequest};
use async_trait::async_trait;
use eyre::{eyre, Result};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

use super::{BlockTransaction, ChainRpc, Connector, ScannedBlock};
use crate::chains::ChainConfig;

pub struct AlloyRpc {
    provider: RootProvider<Ethereum>,
    timeout: Duration,
}

impl AlloyRpc {
    pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self> {
        let url: reqwest::Url = rpc_url
            .parse()
            .map_err(|e| eyre!("Invalid RPC URL {}: {}", rpc_url, e))?;

        Ok(Self {
            provider: RootProvider::<Ethereum>::new_http(url),
            timeout,
        })
    }

    /// Await an RPC request under the configured timeout
    async fn timed<F, T, E>(&self, method: &str, request: F) -> Result<T>
    where
        F: IntoFuture<Output = std::result::Result<T, E>>,
        E: std::fmt::Display,
    {
        trace!("→ {}", method);
        match tokio::time::timeout(self.timeout, request.into_future()).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(eyre!("{} failed: {}", method, e)),
            Err(_) => Err(eyre!("{} timed out after {:?}", method, self.timeout)),
        }
    }
}

#[async_trait]
impl ChainRpc for AlloyRpc {
    async fn block_number(&self) -> Result<u64> {
        self.timed("eth_blockNumber", self.provider.get_block_number())
            .await
    }

    async fn chain_id(&self) -> Result<u64> {
        self.timed("eth_chainId", self.provider.get_chain_id()).await
    }

    async fn block_with_transactions(&self, number: u64) -> Result<ScannedBlock> {
        let block = self
            .timed(
                "eth_getBlockByNumber",
                self.provider
                    .get_block_by_number(BlockNumberOrTag::Number(number))
                    .full(),
            )
            .await?
            .ok_or_else(|| eyre!("block {} not found", number))?;

        let transactions = match &block.transactions {
            BlockTransactions::Full(txs) => txs
                .iter()
                .map(|tx| BlockTransaction {
                    hash: TransactionResponse::tx_hash(tx),
                    from: TransactionResponse::from(tx),
                    to: alloy_consensus::Transaction::to(tx),
                })
                .collect(),
            _ => {
                return Err(eyre!(
                    "block {} returned without transaction bodies",
                    number
                ))
            }
        };

        Ok(ScannedBlock {
            number,
            timestamp: block.header.timestamp,
            transactions,
        })
    }

    async fn contract_address(&self, tx_hash: TxHash) -> Result<Option<Address>> {
        let receipt = self
            .timed(
                "eth_getTransactionReceipt",
                self.provider.get_transaction_receipt(tx_hash),
            )
            .await?
            .ok_or_else(|| eyre!("no receipt for {}", tx_hash))?;

        Ok(receipt.contract_address)
    }

    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default().to(to).input(calldata.into());
        self.timed("eth_call", self.provider.call(tx)).await
    }
}

/// Opens [`AlloyRpc`] endpoints from chain configs
pub struct AlloyConnector {
    timeout: Duration,
}

impl AlloyConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Connector for AlloyConnector {
    async fn connect(&self, chain: &ChainConfig) -> Result<Arc<dyn ChainRpc>> {
        let rpc = AlloyRpc::new(&chain.rpc_url, self.timeout)?;
        Ok(Arc::new(rpc) as Arc<dyn ChainRpc>)
    }
}
