//! Superscan - multi-chain new-token scanner
//!
//! Watches recent blocks on a set of EVM chains (with the OP Stack
//! "Superchain" as first-class citizens), finds freshly deployed contracts,
//! reads their ERC-20 metadata, checks whether a Uniswap V2/V3 pool against
//! WETH already exists and, for those that have one, pulls market data from
//! DexScreener.

pub mod chains;
pub mod config;
pub mod detector;
pub mod error;
pub mod findings;
pub mod market_data;
pub mod orchestrator;
pub mod report;
pub mod rpc;

pub use chains::{ChainConfig, ChainRegistry};
pub use config::ScannerConfig;
pub use error::ScanError;
pub use findings::{ContractFinding, LiquidityStatus, LpStatus, ScanResults};
pub use orchestrator::ScanOrchestrator;
pub use report::{summarize, ScanReport, ScanSummary};
