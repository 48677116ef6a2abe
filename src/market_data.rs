//! Market Data - DexScreener API Integration
//!
//! Looks up price, 24h volume and liquidity for tokens that already have a
//! pool. All lookups in the process share one [`RateGate`], so consecutive
//! HTTP requests start at least `min_interval` apart no matter which chain
//! or scan issued them.
//!
//! API: https://api.dexscreener.com/latest/dex/tokens/{address}

use async_trait::async_trait;
use eyre::Result;
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::chains::ChainConfig;
use crate::config::ScannerConfig;
use crate::error::ScanError;
use crate::findings::MarketSnapshot;

// ============================================
// CONSTANTS
// ============================================

/// Chains whose DexScreener label differs from our chain name
const CHAIN_LABELS: &[(&str, &str)] = &[("world", "worldchain")];

const UNKNOWN_DEX: &str = "unknown";

/// DexScreener label for a chain (falls back to the chain name itself)
pub fn dexscreener_label(chain_name: &str) -> &str {
    CHAIN_LABELS
        .iter()
        .find(|(name, _)| *name == chain_name)
        .map(|(_, label)| *label)
        .unwrap_or(chain_name)
}

// ============================================
// API RESPONSE TYPES
// ============================================

#[derive(Debug, Deserialize)]
struct TokenPairsResponse {
    #[serde(default)]
    pairs: Option<Vec<DexPair>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexPair {
    #[serde(default)]
    pub chain_id: String,
    #[serde(default)]
    pub dex_id: Option<String>,
    #[serde(default)]
    pub pair_address: Option<String>,
    #[serde(default)]
    pub price_usd: Option<String>,
    #[serde(default)]
    pub volume: Option<DexVolume>,
    #[serde(default)]
    pub liquidity: Option<DexLiquidity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DexVolume {
    pub h24: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DexLiquidity {
    pub usd: Option<f64>,
}

impl DexPair {
    /// Matched on the numeric chain id only; slug-tagged pairs are ignored
    fn is_on(&self, chain: &ChainConfig) -> bool {
        self.chain_id == chain.chain_id.to_string()
    }

    fn to_snapshot(&self, chain: &ChainConfig) -> MarketSnapshot {
        MarketSnapshot {
            price_usd: self.price_usd.clone().unwrap_or_else(|| "0".to_string()),
            volume_24h: self.volume.as_ref().and_then(|v| v.h24).unwrap_or(0.0),
            liquidity: self.liquidity.as_ref().and_then(|l| l.usd).unwrap_or(0.0),
            pair_address: self.pair_address.clone().unwrap_or_default(),
            dex: self
                .dex_id
                .clone()
                .unwrap_or_else(|| UNKNOWN_DEX.to_string()),
            chain: dexscreener_label(&chain.name).to_string(),
        }
    }
}

/// First pair on `chain`, in response order
pub fn select_pair(pairs: &[DexPair], chain: &ChainConfig) -> Option<MarketSnapshot> {
    pairs
        .iter()
        .find(|pair| pair.is_on(chain))
        .map(|pair| pair.to_snapshot(chain))
}

// ============================================
// RATE GATE
// ============================================

/// Process-wide spacing between outbound market-data requests
///
/// The lock is held for the whole request, so concurrent callers queue up
/// and each one waits out the interval measured from the previous request's
/// completion.
#[derive(Debug)]
pub struct RateGate {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Wait for the gate, run `request`, then stamp the completion time
    /// (whether or not the request succeeded)
    pub async fn run<F: Future>(&self, request: F) -> F::Output {
        let mut last_call = self.last_call.lock().await;

        if let Some(last) = *last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!("⏳ Rate limiting market data: waiting {:?}", wait);
                tokio::time::sleep(wait).await;
            }
        }

        let output = request.await;
        *last_call = Some(Instant::now());
        output
    }
}

// ============================================
// DATA SOURCE
// ============================================

#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// All pairs the aggregator knows for `token_address`, on any chain
    async fn token_pairs(&self, token_address: &str) -> Result<Vec<DexPair>, ScanError>;
}

pub struct DexScreenerSource {
    http_client: Client,
    base_url: String,
}

impl DexScreenerSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MarketDataSource for DexScreenerSource {
    async fn token_pairs(&self, token_address: &str) -> Result<Vec<DexPair>, ScanError> {
        let url = format!("{}/tokens/{}", self.base_url, token_address);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ScanError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Fetch(format!("HTTP {} for {}", status, url)));
        }

        let body: TokenPairsResponse = response
            .json()
            .await
            .map_err(|e| ScanError::Fetch(format!("invalid response body: {}", e)))?;

        Ok(body.pairs.unwrap_or_default())
    }
}

// ============================================
// FETCHER
// ============================================

pub struct MarketDataFetcher {
    source: Arc<dyn MarketDataSource>,
    gate: Arc<RateGate>,
}

impl MarketDataFetcher {
    pub fn new(source: Arc<dyn MarketDataSource>, gate: Arc<RateGate>) -> Self {
        Self { source, gate }
    }

    /// DexScreener-backed fetcher sharing `gate`
    pub fn from_config(config: &ScannerConfig, gate: Arc<RateGate>) -> Result<Self> {
        let source = DexScreenerSource::new(&config.market_data_base_url, config.market_data_timeout())?;
        Ok(Self::new(Arc::new(source), gate))
    }

    /// Market data for the first pair of `token_address` on `chain`
    ///
    /// Transport errors, non-2xx statuses and "no pair on this chain" all
    /// come back as `None`.
    pub async fn fetch(&self, token_address: &str, chain: &ChainConfig) -> Option<MarketSnapshot> {
        match self.gate.run(self.source.token_pairs(token_address)).await {
            Ok(pairs) => {
                let snapshot = select_pair(&pairs, chain);
                if snapshot.is_none() {
                    debug!(
                        "No {} pair among {} DexScreener results for {}",
                        chain.name,
                        pairs.len(),
                        token_address
                    );
                }
                snapshot
            }
            Err(e) => {
                warn!("⚠️ DexScreener API error for {}: {}", token_address, e);
                None
            }
        }
    }
}
