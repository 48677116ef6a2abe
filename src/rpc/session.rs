//! Chain selection and live sessions

use std::sync::Arc;
use tracing::{info, warn};

use super::{ChainRpc, Connector};
use crate::chains::ChainConfig;
use crate::error::ScanError;

/// A chain config paired with a verified, live endpoint
///
/// Owned by exactly one scan at a time; switching chains means building a
/// new session and dropping the old one.
#[derive(Clone)]
pub struct ChainSession {
    config: ChainConfig,
    rpc: Arc<dyn ChainRpc>,
    connected_at_block: u64,
}

impl ChainSession {
    pub fn new(config: ChainConfig, rpc: Arc<dyn ChainRpc>, connected_at_block: u64) -> Self {
        Self {
            config,
            rpc,
            connected_at_block,
        }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn rpc(&self) -> &dyn ChainRpc {
        self.rpc.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Head block observed when the session was opened
    pub fn connected_at_block(&self) -> u64 {
        self.connected_at_block
    }
}

impl std::fmt::Debug for ChainSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainSession")
            .field("chain", &self.config.name)
            .field("chain_id", &self.config.chain_id)
            .field("connected_at_block", &self.connected_at_block)
            .finish()
    }
}

/// Connect to a chain and verify it is live and is the chain we think it is
pub async fn select(
    connector: &dyn Connector,
    config: &ChainConfig,
) -> Result<ChainSession, ScanError> {
    let connection_error = |reason: String| ScanError::Connection {
        chain: config.name.clone(),
        reason,
    };

    let rpc = connector
        .connect(config)
        .await
        .map_err(|e| connection_error(e.to_string()))?;

    let latest_block = rpc
        .block_number()
        .await
        .map_err(|e| connection_error(e.to_string()))?;

    let chain_id = rpc
        .chain_id()
        .await
        .map_err(|e| connection_error(e.to_string()))?;

    if chain_id != config.chain_id {
        warn!(
            "❌ {} endpoint reports chain id {} (expected {})",
            config.name, chain_id, config.chain_id
        );
        return Err(ScanError::ChainIdMismatch {
            chain: config.name.clone(),
            expected: config.chain_id,
            actual: chain_id,
        });
    }

    info!(
        "✅ Switched to {} ({}). Latest block: {}, Chain ID: {}",
        config.name.to_uppercase(),
        config.stack_label(),
        latest_block,
        chain_id
    );

    Ok(ChainSession::new(config.clone(), rpc, latest_block))
}
