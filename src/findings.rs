//! Per-contract scan results

use alloy_primitives::{Address, TxHash};
use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// ERC-20 descriptive fields; each one independently falls back to its default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Human-scaled (divided by 10^decimals)
    pub total_supply: f64,
}

impl TokenMetadata {
    pub const DEFAULT_NAME: &'static str = "Unknown";
    pub const DEFAULT_SYMBOL: &'static str = "UNKNOWN";
    pub const DEFAULT_DECIMALS: u8 = 18;
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            symbol: Self::DEFAULT_SYMBOL.to_string(),
            decimals: Self::DEFAULT_DECIMALS,
            total_supply: 0.0,
        }
    }
}

/// Outcome classification of a liquidity probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LpStatus {
    /// A pool exists on at least one protocol generation
    Present,
    /// Probe ran cleanly and found nothing (or no factory is configured)
    Absent,
    /// No token address to probe
    NoAddress,
    /// Probe failed outside the per-generation guards
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityStatus {
    pub v2: bool,
    pub v3: bool,
    pub status: LpStatus,
}

impl LiquidityStatus {
    pub fn from_checks(v2: bool, v3: bool) -> Self {
        let status = if v2 || v3 {
            LpStatus::Present
        } else {
            LpStatus::Absent
        };
        Self { v2, v3, status }
    }

    pub fn no_address() -> Self {
        Self {
            v2: false,
            v3: false,
            status: LpStatus::NoAddress,
        }
    }

    pub fn error() -> Self {
        Self {
            v2: false,
            v3: false,
            status: LpStatus::Error,
        }
    }

    pub fn is_present(&self) -> bool {
        self.status == LpStatus::Present
    }
}

/// Market data for the first matching pool on the scanned chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub price_usd: String,
    pub volume_24h: f64,
    pub liquidity: f64,
    pub pair_address: String,
    pub dex: String,
    pub chain: String,
}

/// One detected contract deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractFinding {
    pub chain: String,
    pub chain_id: u64,
    pub is_op_stack: bool,
    pub block: u64,
    pub hash: TxHash,
    pub deployer: Address,
    /// EIP-55 checksummed
    pub contract_address: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: TokenMetadata,
    pub lp_info: LiquidityStatus,
    /// Only populated when `lp_info.status` is `present`
    pub dex_data: Option<MarketSnapshot>,
    pub explorer_url: String,
}

impl ContractFinding {
    pub fn has_liquidity(&self) -> bool {
        self.lp_info.is_present()
    }
}

// ============================================
// PER-CHAIN RESULTS
// ============================================

/// Findings keyed by chain name, in the order the chains were requested
///
/// Serializes as a JSON object whose keys keep that order. Every requested
/// chain has an entry, even when it was unreachable (empty list).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResults {
    chains: Vec<(String, Vec<ContractFinding>)>,
}

impl ScanResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a chain's findings; a repeated chain replaces its earlier entry in place
    pub fn insert(&mut self, chain: String, findings: Vec<ContractFinding>) {
        match self.chains.iter_mut().find(|(name, _)| *name == chain) {
            Some((_, existing)) => *existing = findings,
            None => self.chains.push((chain, findings)),
        }
    }

    pub fn get(&self, chain: &str) -> Option<&[ContractFinding]> {
        self.chains
            .iter()
            .find(|(name, _)| name == chain)
            .map(|(_, findings)| findings.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ContractFinding])> {
        self.chains
            .iter()
            .map(|(name, findings)| (name.as_str(), findings.as_slice()))
    }

    pub fn chain_names(&self) -> Vec<String> {
        self.chains.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// All findings, chain by chain
    pub fn flattened(&self) -> Vec<ContractFinding> {
        self.chains
            .iter()
            .flat_map(|(_, findings)| findings.iter().cloned())
            .collect()
    }

    pub fn total_findings(&self) -> usize {
        self.chains.iter().map(|(_, findings)| findings.len()).sum()
    }
}

impl FromIterator<(String, Vec<ContractFinding>)> for ScanResults {
    fn from_iter<I: IntoIterator<Item = (String, Vec<ContractFinding>)>>(iter: I) -> Self {
        let mut results = Self::new();
        for (chain, findings) in iter {
            results.insert(chain, findings);
        }
        results
    }
}

impl Serialize for ScanResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for ScanResults {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ResultsVisitor;

        impl<'de> Visitor<'de> for ResultsVisitor {
            type Value = ScanResults;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of chain name to findings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut results = ScanResults::new();
                while let Some((chain, findings)) = access.next_entry::<String, Vec<ContractFinding>>()? {
                    results.insert(chain, findings);
                }
                Ok(results)
            }
        }

        deserializer.deserialize_map(ResultsVisitor)
    }
}
