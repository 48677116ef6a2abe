//! Scanner Configuration
//!
//! Timeouts, rate limits, output location and default scan plans.
//! Loaded from environment variables (and `.env`) or a TOML file.

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration struct for the scanner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    // ========== Network Settings ==========
    /// Timeout applied to every individual RPC call
    pub rpc_timeout_secs: u64,

    // ========== Market Data ==========
    /// DexScreener API base (without the `/tokens/` suffix)
    pub market_data_base_url: String,

    /// HTTP timeout for market-data requests
    pub market_data_timeout_secs: u64,

    /// Minimum spacing between market-data requests, process-wide
    pub market_data_min_interval_ms: u64,

    // ========== Scan Plans ==========
    /// Blocks scanned per chain in the Superchain pass
    pub superchain_block_count: u64,

    /// Blocks scanned per chain in the comparison pass
    pub comparison_block_count: u64,

    /// Chains scanned in the comparison pass
    pub comparison_chains: Vec<String>,

    /// Scan chains concurrently (one task per chain)
    pub parallel_chains: bool,

    // ========== Output ==========
    /// Directory reports are written to
    pub output_dir: String,

    /// Per-chain RPC endpoint overrides, keyed by chain name.
    /// Kept last: TOML tables must follow plain values.
    pub rpc_overrides: HashMap<String, String>,
}

impl ScannerConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            rpc_timeout_secs: env::var("RPC_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.rpc_timeout_secs),

            market_data_base_url: env::var("MARKET_DATA_URL")
                .unwrap_or(defaults.market_data_base_url),
            market_data_timeout_secs: env::var("MARKET_DATA_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.market_data_timeout_secs),
            market_data_min_interval_ms: env::var("MARKET_DATA_MIN_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.market_data_min_interval_ms),

            superchain_block_count: env::var("SUPERCHAIN_BLOCK_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.superchain_block_count),
            comparison_block_count: env::var("COMPARISON_BLOCK_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.comparison_block_count),
            comparison_chains: env::var("COMPARISON_CHAINS")
                .map(|s| Self::parse_chain_list(&s))
                .unwrap_or(defaults.comparison_chains),
            parallel_chains: env::var("PARALLEL_CHAINS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.parallel_chains),

            output_dir: env::var("OUTPUT_DIR").unwrap_or(defaults.output_dir),
            rpc_overrides: defaults.rpc_overrides,
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Split a comma-separated chain list, dropping blanks
    pub fn parse_chain_list(s: &str) -> Vec<String> {
        s.split(',')
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect()
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn market_data_timeout(&self) -> Duration {
        Duration::from_secs(self.market_data_timeout_secs)
    }

    pub fn market_data_min_interval(&self) -> Duration {
        Duration::from_millis(self.market_data_min_interval_ms)
    }

    /// Full path of a report file inside the output directory
    pub fn output_path(&self, filename: &str) -> PathBuf {
        Path::new(&self.output_dir).join(filename)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Timeouts must be finite and non-zero
        if self.rpc_timeout_secs == 0 {
            return Err(eyre::eyre!("RPC_TIMEOUT_SECS must be greater than 0"));
        }
        if self.market_data_timeout_secs == 0 {
            return Err(eyre::eyre!("MARKET_DATA_TIMEOUT_SECS must be greater than 0"));
        }
        if !self.market_data_base_url.starts_with("http") {
            return Err(eyre::eyre!(
                "Invalid MARKET_DATA_URL: {}",
                self.market_data_base_url
            ));
        }
        if self.output_dir.is_empty() {
            return Err(eyre::eyre!("OUTPUT_DIR must not be empty"));
        }

        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║              SUPERSCAN - CONFIGURATION                     ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ NETWORK                                                    ║");
        println!("║ • RPC Timeout:     {:>38}s ║", self.rpc_timeout_secs);
        println!("║ • RPC Overrides:   {:^40} ║", self.rpc_overrides.len());
        println!("║ • Parallel Chains: {:^40} ║",
            if self.parallel_chains { "✓ Enabled" } else { "✗ Sequential" }
        );
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ MARKET DATA                                                ║");
        println!("║ • Timeout:         {:>38}s ║", self.market_data_timeout_secs);
        println!("║ • Min Interval:    {:>37}ms ║", self.market_data_min_interval_ms);
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ SCAN PLAN                                                  ║");
        println!("║ • Superchain:      {:>32} blocks ║", self.superchain_block_count);
        println!("║ • Comparison:      {:>32} blocks ║", self.comparison_block_count);
        println!("║ • Output Dir:      {:^40} ║", self.output_dir);
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            rpc_timeout_secs: 15,
            market_data_base_url: "https://api.dexscreener.com/latest/dex".to_string(),
            market_data_timeout_secs: 10,
            market_data_min_interval_ms: 1000,
            superchain_block_count: 10,
            comparison_block_count: 5,
            comparison_chains: ["base", "optimism", "mode", "ethereum", "arbitrum"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            parallel_chains: false,
            output_dir: "public".to_string(),
            rpc_overrides: HashMap::new(),
        }
    }
}

// ============================================
// TESTS
// ============================================
