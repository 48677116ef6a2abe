//! Multi-chain scan orchestration
//!
//! Runs the block scanner over a list of chains and collects the findings
//! per chain. By default chains are scanned one at a time with a single
//! active session; parallel mode scans them concurrently with one session
//! per chain. Either way every requested chain gets an entry in the results,
//! and the market-data rate gate is shared by all of them.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

use crate::chains::ChainRegistry;
use crate::config::ScannerConfig;
use crate::detector::BlockScanner;
use crate::error::ScanError;
use crate::findings::{ContractFinding, ScanResults};
use crate::market_data::{MarketDataFetcher, RateGate};
use crate::rpc::{select, AlloyConnector, ChainSession, Connector};

pub struct ScanOrchestrator {
    registry: Arc<ChainRegistry>,
    connector: Arc<dyn Connector>,
    scanner: BlockScanner,
    parallel: bool,
}

impl ScanOrchestrator {
    pub fn new(
        registry: Arc<ChainRegistry>,
        connector: Arc<dyn Connector>,
        fetcher: Arc<MarketDataFetcher>,
    ) -> Self {
        Self {
            registry,
            connector,
            scanner: BlockScanner::new(fetcher),
            parallel: false,
        }
    }

    /// Live orchestrator: alloy HTTP endpoints, DexScreener market data
    pub fn from_config(config: &ScannerConfig, registry: Arc<ChainRegistry>) -> eyre::Result<Self> {
        let gate = Arc::new(RateGate::new(config.market_data_min_interval()));
        let fetcher = Arc::new(MarketDataFetcher::from_config(config, gate)?);
        let connector = Arc::new(AlloyConnector::new(config.rpc_timeout()));

        Ok(Self::new(registry, connector, fetcher).with_parallel(config.parallel_chains))
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Scan each named chain over its last `block_count` blocks
    pub async fn scan_chains(&self, chains: &[String], block_count: u64) -> ScanResults {
        info!(
            "🌐 Multi-chain scan: {} ({} blocks each, {})",
            chains.join(", "),
            block_count,
            if self.parallel { "parallel" } else { "sequential" }
        );

        if self.parallel {
            let scans = chains.iter().map(|name| async move {
                let session = self.open_session(name).await;
                let findings = self.scan_session(name, session.as_ref(), block_count).await;
                (name.clone(), findings)
            });
            return join_all(scans).await.into_iter().collect();
        }

        let mut results = ScanResults::new();
        let mut active: Option<ChainSession> = None;

        for name in chains {
            // Switching chains drops the previous session first
            drop(active.take());
            active = self.open_session(name).await;

            let findings = self.scan_session(name, active.as_ref(), block_count).await;
            results.insert(name.clone(), findings);
        }

        results
    }

    /// Scan every OP Stack chain in the registry
    pub async fn scan_superchain(&self, block_count: u64) -> ScanResults {
        let chains = self.registry.op_stack_chains();
        info!("🔴 Superchain scan across {} OP Stack chains", chains.len());
        self.scan_chains(&chains, block_count).await
    }

    async fn open_session(&self, name: &str) -> Option<ChainSession> {
        let Some(config) = self.registry.get(name) else {
            warn!(
                "❌ {} (available: {})",
                ScanError::UnknownChain(name.to_string()),
                self.registry.names().join(", ")
            );
            return None;
        };

        match select(self.connector.as_ref(), config).await {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("❌ Skipping {}: {}", name.to_uppercase(), e);
                None
            }
        }
    }

    async fn scan_session(
        &self,
        name: &str,
        session: Option<&ChainSession>,
        block_count: u64,
    ) -> Vec<ContractFinding> {
        let Some(session) = session else {
            return Vec::new();
        };

        let findings = self.scanner.scan(session, block_count).await;
        info!(
            "✅ {} scan complete: {} contracts ({} with liquidity)",
            name.to_uppercase(),
            findings.len(),
            findings.iter().filter(|f| f.has_liquidity()).count()
        );
        findings
    }
}
