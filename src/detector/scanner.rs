//! Block Scanner - finds contract deployments in recent blocks
//!
//! For each block in `[latest - count, latest]` (inclusive, ascending):
//! 1. Fetch the block with full transaction bodies
//! 2. Keep transactions with no recipient (contract creations)
//! 3. Resolve the created address from the receipt
//! 4. Read token metadata, probe for liquidity, fetch market data if pooled
//!
//! Failures are contained at the smallest unit: a bad receipt skips one
//! transaction, a bad block skips one block, an unreachable head skips the
//! whole scan (empty result).

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::metadata::introspect;
use super::probe::probe;
use crate::error::ScanError;
use crate::findings::ContractFinding;
use crate::market_data::MarketDataFetcher;
use crate::rpc::{BlockTransaction, ChainSession, ScannedBlock};

pub struct BlockScanner {
    fetcher: Arc<MarketDataFetcher>,
}

impl BlockScanner {
    pub fn new(fetcher: Arc<MarketDataFetcher>) -> Self {
        Self { fetcher }
    }

    /// Scan the last `block_count` blocks (plus the head) of the session's chain
    pub async fn scan(&self, session: &ChainSession, block_count: u64) -> Vec<ContractFinding> {
        let latest = match session.rpc().block_number().await {
            Ok(latest) => latest,
            Err(e) => {
                warn!("❌ Could not read head of {}: {}", session.name(), e);
                return Vec::new();
            }
        };

        let start = latest.saturating_sub(block_count);
        info!(
            "🔍 Scanning {} blocks on {} ({} to {})...",
            latest - start + 1,
            session.name().to_uppercase(),
            start,
            latest
        );

        let mut findings = Vec::new();
        for number in start..=latest {
            match self.scan_block(session, number).await {
                Ok(found) => findings.extend(found),
                Err(e) => warn!("⚠️ Skipping {} {}", session.name(), e),
            }
        }

        findings
    }

    async fn scan_block(
        &self,
        session: &ChainSession,
        number: u64,
    ) -> Result<Vec<ContractFinding>, ScanError> {
        debug!("📦 Processing block {}...", number);

        let block = session
            .rpc()
            .block_with_transactions(number)
            .await
            .map_err(|e| ScanError::BlockProcessing {
                block: number,
                reason: e.to_string(),
            })?;

        let timestamp = block_time(&block)?;

        let mut findings = Vec::new();
        for tx in block.transactions.iter().filter(|tx| tx.is_contract_creation()) {
            let contract = match session.rpc().contract_address(tx.hash).await {
                Ok(Some(contract)) => contract,
                Ok(None) => {
                    debug!("Creation tx {} has no contract address", tx.hash);
                    continue;
                }
                Err(e) => {
                    warn!("⚠️ Could not get contract address for {}: {}", tx.hash, e);
                    continue;
                }
            };

            findings.push(self.inspect(session, &block, tx, contract, timestamp).await);
        }

        Ok(findings)
    }

    /// Build the full finding for one freshly deployed contract
    async fn inspect(
        &self,
        session: &ChainSession,
        block: &ScannedBlock,
        tx: &BlockTransaction,
        contract: Address,
        timestamp: DateTime<Utc>,
    ) -> ContractFinding {
        let config = session.config();
        let contract_address = contract.to_checksum(None);
        info!(
            "🆕 New contract on {}: {}",
            config.name.to_uppercase(),
            contract_address
        );

        let metadata = introspect(session.rpc(), contract).await;
        let lp_info = probe(session, &contract_address).await;

        let dex_data = if lp_info.is_present() {
            self.fetcher.fetch(&contract_address, config).await
        } else {
            None
        };

        if lp_info.is_present() {
            info!(
                "💧 {} ({}) has liquidity (V2: {}, V3: {})",
                metadata.symbol, contract_address, lp_info.v2, lp_info.v3
            );
        }

        ContractFinding {
            chain: config.name.clone(),
            chain_id: config.chain_id,
            is_op_stack: config.is_op_stack,
            block: block.number,
            hash: tx.hash,
            deployer: tx.from,
            explorer_url: config.explorer_address_url(&contract),
            contract_address,
            timestamp,
            metadata,
            lp_info,
            dex_data,
        }
    }
}

fn block_time(block: &ScannedBlock) -> Result<DateTime<Utc>, ScanError> {
    i64::try_from(block.timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| ScanError::BlockProcessing {
            block: block.number,
            reason: format!("invalid timestamp {}", block.timestamp),
        })
}
