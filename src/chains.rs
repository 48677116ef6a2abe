//! Chain registry for the scanner
//!
//! Includes:
//! - OP Stack Superchain members (Base, Optimism, Mode, Zora, Fraxtal, World, Lisk)
//! - Non-OP comparison chains (Ethereum, Arbitrum, Polygon)
//!
//! Chains without a known Uniswap deployment carry the zero address as
//! factory; the liquidity probe treats that as "not configured".

use alloy_primitives::{address, Address};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

/// Static parameters of one supported network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub name: String,
    pub rpc_url: String,
    pub chain_id: u64,
    /// Wrapped native asset used as the quote side of every LP lookup
    pub weth_address: Address,
    /// Generation-1 factory (`getPair`)
    pub uniswap_v2_factory: Address,
    /// Generation-2 factory (`getPool` per fee tier)
    pub uniswap_v3_factory: Address,
    pub block_time: f64,
    pub is_op_stack: bool,
    pub explorer_url: String,
}

impl ChainConfig {
    pub fn has_v2_factory(&self) -> bool {
        !self.uniswap_v2_factory.is_zero()
    }

    pub fn has_v3_factory(&self) -> bool {
        !self.uniswap_v3_factory.is_zero()
    }

    pub fn explorer_address_url(&self, address: &Address) -> String {
        format!(
            "{}/address/{}",
            self.explorer_url.trim_end_matches('/'),
            address.to_checksum(None)
        )
    }

    /// Human-readable stack tag for console output
    pub fn stack_label(&self) -> &'static str {
        if self.is_op_stack {
            "OP Stack"
        } else {
            "Non-OP"
        }
    }
}

/// OP Stack predeploy WETH, identical on every Superchain member
const OP_WETH: Address = address!("4200000000000000000000000000000000000006");

/// Canonical Uniswap V3 factory (Ethereum, Optimism, Arbitrum, Polygon)
const UNISWAP_V3_CANONICAL: Address = address!("1F98431c8aD98523631AE4a59f267346ea31F984");

#[allow(clippy::too_many_arguments)]
fn chain(
    name: &str,
    rpc_url: &str,
    chain_id: u64,
    weth: Address,
    v2_factory: Address,
    v3_factory: Address,
    block_time: f64,
    is_op_stack: bool,
    explorer_url: &str,
) -> ChainConfig {
    ChainConfig {
        name: name.to_string(),
        rpc_url: rpc_url.to_string(),
        chain_id,
        weth_address: weth,
        uniswap_v2_factory: v2_factory,
        uniswap_v3_factory: v3_factory,
        block_time,
        is_op_stack,
        explorer_url: explorer_url.to_string(),
    }
}

fn builtin_chains() -> Vec<ChainConfig> {
    vec![
        chain(
            "ethereum",
            "https://ethereum.publicnode.com",
            1,
            address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
            address!("5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f"),
            UNISWAP_V3_CANONICAL,
            12.0,
            false,
            "https://etherscan.io",
        ),
        chain(
            "base",
            "https://mainnet.base.org",
            8453,
            OP_WETH,
            address!("8909Dc15e40173Ff4699343b6eB8132c65e18eC6"),
            address!("33128a8fC17869897dcE68Ed026d694621f6FDfD"),
            2.0,
            true,
            "https://basescan.org",
        ),
        chain(
            "optimism",
            "https://mainnet.optimism.io",
            10,
            OP_WETH,
            // Alternative DEX, no canonical V2 deployment
            address!("0c4c792E6E01f6B8c2C44c66bB69f4C2c2039b26"),
            UNISWAP_V3_CANONICAL,
            2.0,
            true,
            "https://optimistic.etherscan.io",
        ),
        chain(
            "mode",
            "https://mainnet.mode.network",
            34443,
            OP_WETH,
            address!("5C7BC93471A28D5a29C6052a8E4B238009de6ac6"),
            address!("6BDED42c6DA8FBf0d2bA55B2fa120C5e0c8D7891"),
            2.0,
            true,
            "https://explorer.mode.network",
        ),
        chain(
            "zora",
            "https://rpc.zora.energy",
            7777777,
            OP_WETH,
            Address::ZERO,
            Address::ZERO,
            2.0,
            true,
            "https://explorer.zora.energy",
        ),
        chain(
            "fraxtal",
            "https://rpc.frax.com",
            252,
            OP_WETH,
            Address::ZERO,
            Address::ZERO,
            2.0,
            true,
            "https://fraxscan.com",
        ),
        chain(
            "world",
            "https://worldchain-mainnet.g.alchemy.com/public",
            480,
            OP_WETH,
            Address::ZERO,
            Address::ZERO,
            2.0,
            true,
            "https://worldscan.org",
        ),
        chain(
            "lisk",
            "https://rpc.api.lisk.com",
            1135,
            OP_WETH,
            Address::ZERO,
            Address::ZERO,
            2.0,
            true,
            "https://blockscout.lisk.com",
        ),
        chain(
            "arbitrum",
            "https://arbitrum.publicnode.com",
            42161,
            address!("82aF49447D8a07e3bd95BD0d56f35241523fBab1"),
            address!("f1D7CC64Fb4452F05c498126312eBE29f30Fbcf9"),
            UNISWAP_V3_CANONICAL,
            0.25,
            false,
            "https://arbiscan.io",
        ),
        chain(
            "polygon",
            "https://polygon.llamarpc.com",
            137,
            // WMATIC
            address!("0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"),
            // QuickSwap
            address!("5757371414417b8C6CAad45bAeF941aBc7d3Ab32"),
            UNISWAP_V3_CANONICAL,
            2.0,
            false,
            "https://polygonscan.com",
        ),
    ]
}

lazy_static! {
    static ref BUILTIN: ChainRegistry = ChainRegistry::new(builtin_chains());
}

// ============================================
// SUPERCHAIN SUMMARY
// ============================================

/// Registry-derived split of chains by architecture family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperchainSummary {
    pub total_op_chains: usize,
    pub op_chains: Vec<String>,
    pub non_op_chains: Vec<String>,
}

// ============================================
// REGISTRY
// ============================================

/// Read-only set of chains, in registration order
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: Vec<ChainConfig>,
}

impl ChainRegistry {
    pub fn new(chains: Vec<ChainConfig>) -> Self {
        Self { chains }
    }

    /// The built-in table with `<CHAIN>_RPC_URL` environment overrides applied
    pub fn builtin() -> Self {
        let mut registry = BUILTIN.clone();
        for chain in &mut registry.chains {
            let key = format!("{}_RPC_URL", chain.name.to_uppercase());
            if let Ok(url) = env::var(&key) {
                if !url.is_empty() {
                    chain.rpc_url = url;
                }
            }
        }
        registry
    }

    /// Replace RPC endpoints for the named chains (unknown names are ignored)
    pub fn with_rpc_overrides(mut self, overrides: &HashMap<String, String>) -> Self {
        for chain in &mut self.chains {
            if let Some(url) = overrides.get(&chain.name) {
                chain.rpc_url = url.clone();
            }
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.name == name)
    }

    pub fn is_op_stack(&self, name: &str) -> bool {
        self.get(name).map(|c| c.is_op_stack).unwrap_or(false)
    }

    pub fn names(&self) -> Vec<String> {
        self.chains.iter().map(|c| c.name.clone()).collect()
    }

    pub fn op_stack_chains(&self) -> Vec<String> {
        self.chains
            .iter()
            .filter(|c| c.is_op_stack)
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn superchain_summary(&self) -> SuperchainSummary {
        let op_chains = self.op_stack_chains();
        SuperchainSummary {
            total_op_chains: op_chains.len(),
            op_chains,
            non_op_chains: self
                .chains
                .iter()
                .filter(|c| !c.is_op_stack)
                .map(|c| c.name.clone())
                .collect(),
        }
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        BUILTIN.clone()
    }
}
