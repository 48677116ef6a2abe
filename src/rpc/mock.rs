//! In-memory chain endpoint for tests

use alloy_primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;
use eyre::{eyre, Result};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::{ChainRpc, Connector, ScannedBlock};
use crate::chains::ChainConfig;

#[derive(Default)]
pub struct MockRpc {
    chain_id: u64,
    latest_block: u64,
    offline: bool,
    blocks: HashMap<u64, ScannedBlock>,
    failing_blocks: HashSet<u64>,
    receipts: HashMap<TxHash, Option<Address>>,
    failing_receipts: HashSet<TxHash>,
    responses: HashMap<(Address, Bytes), Bytes>,
    calls: Mutex<Vec<(Address, Bytes)>>,
    block_requests: Mutex<Vec<u64>>,
}

impl MockRpc {
    pub fn new(chain_id: u64, latest_block: u64) -> Self {
        Self {
            chain_id,
            latest_block,
            ..Default::default()
        }
    }

    /// Every request fails
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub fn with_block(mut self, block: ScannedBlock) -> Self {
        self.blocks.insert(block.number, block);
        self
    }

    pub fn with_failing_block(mut self, number: u64) -> Self {
        self.failing_blocks.insert(number);
        self
    }

    pub fn with_receipt(mut self, tx_hash: TxHash, contract: Option<Address>) -> Self {
        self.receipts.insert(tx_hash, contract);
        self
    }

    pub fn with_failing_receipt(mut self, tx_hash: TxHash) -> Self {
        self.failing_receipts.insert(tx_hash);
        self
    }

    /// Answer `eth_call(to, calldata)` with `output`; unmatched calls revert
    pub fn with_call(mut self, to: Address, calldata: Vec<u8>, output: Vec<u8>) -> Self {
        self.responses
            .insert((to, Bytes::from(calldata)), Bytes::from(output));
        self
    }

    pub fn calls(&self) -> Vec<(Address, Bytes)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, to: Address) -> Vec<Bytes> {
        self.calls()
            .into_iter()
            .filter(|(addr, _)| *addr == to)
            .map(|(_, data)| data)
            .collect()
    }

    pub fn block_requests(&self) -> Vec<u64> {
        self.block_requests.lock().unwrap().clone()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline {
            return Err(eyre!("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl ChainRpc for MockRpc {
    async fn block_number(&self) -> Result<u64> {
        self.check_online()?;
        Ok(self.latest_block)
    }

    async fn chain_id(&self) -> Result<u64> {
        self.check_online()?;
        Ok(self.chain_id)
    }

    async fn block_with_transactions(&self, number: u64) -> Result<ScannedBlock> {
        self.check_online()?;
        self.block_requests.lock().unwrap().push(number);
        if self.failing_blocks.contains(&number) {
            return Err(eyre!("eth_getBlockByNumber timed out"));
        }
        Ok(self.blocks.get(&number).cloned().unwrap_or(ScannedBlock {
            number,
            timestamp: 1_700_000_000 + number,
            transactions: vec![],
        }))
    }

    async fn contract_address(&self, tx_hash: TxHash) -> Result<Option<Address>> {
        self.check_online()?;
        if self.failing_receipts.contains(&tx_hash) {
            return Err(eyre!("receipt lookup failed"));
        }
        self.receipts
            .get(&tx_hash)
            .copied()
            .ok_or_else(|| eyre!("no receipt for {}", tx_hash))
    }

    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes> {
        self.check_online()?;
        self.calls.lock().unwrap().push((to, calldata.clone()));
        self.responses
            .get(&(to, calldata))
            .cloned()
            .ok_or_else(|| eyre!("execution reverted"))
    }
}

/// Hands out pre-built mock endpoints by chain name
#[derive(Default)]
pub struct MockConnector {
    endpoints: HashMap<String, Arc<MockRpc>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain(mut self, name: &str, rpc: MockRpc) -> Self {
        self.endpoints.insert(name.to_string(), Arc::new(rpc));
        self
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, chain: &ChainConfig) -> Result<Arc<dyn ChainRpc>> {
        let rpc = self
            .endpoints
            .get(&chain.name)
            .cloned()
            .ok_or_else(|| eyre!("no route to {}", chain.rpc_url))?;
        Ok(rpc as Arc<dyn ChainRpc>)
    }
}
