//! Scan summaries and persisted reports
//!
//! [`summarize`] turns per-chain results into per-chain and overall
//! liquidity statistics; [`ScanReport`] is the JSON document written to the
//! output directory after each scan phase.

use chrono::{DateTime, Utc};
use console::style;
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::chains::{ChainRegistry, SuperchainSummary};
use crate::findings::{ContractFinding, ScanResults};

// ============================================
// SUMMARY
// ============================================

#[derive(Debug, Clone, PartialEq)]
pub struct ChainRunStats {
    pub contracts: usize,
    pub lp_contracts: usize,
    /// Percentage of contracts with liquidity (0 when nothing was found)
    pub success_rate: f64,
    pub is_op_stack: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanTotals {
    pub total_contracts: usize,
    pub total_lp_contracts: usize,
    pub op_stack_contracts: usize,
    pub non_op_contracts: usize,
    pub overall_success_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanSummary {
    /// In result order
    pub per_chain: Vec<(String, ChainRunStats)>,
    pub totals: ScanTotals,
    /// OP Stack chain with the highest success rate among those that found
    /// anything; the earliest chain wins a tie
    pub best_op_chain: Option<(String, f64)>,
}

fn success_rate(lp_contracts: usize, contracts: usize) -> f64 {
    if contracts == 0 {
        0.0
    } else {
        lp_contracts as f64 / contracts as f64 * 100.0
    }
}

/// Aggregate results; chains not in `registry` count as non-OP
pub fn summarize(results: &ScanResults, registry: &ChainRegistry) -> ScanSummary {
    let mut summary = ScanSummary::default();

    for (chain, findings) in results.iter() {
        let contracts = findings.len();
        let lp_contracts = findings.iter().filter(|f| f.has_liquidity()).count();
        let is_op_stack = registry.is_op_stack(chain);
        let rate = success_rate(lp_contracts, contracts);

        summary.totals.total_contracts += contracts;
        summary.totals.total_lp_contracts += lp_contracts;
        if is_op_stack {
            summary.totals.op_stack_contracts += contracts;

            let beats_best = summary
                .best_op_chain
                .as_ref()
                .map_or(true, |(_, best)| rate > *best);
            if contracts > 0 && beats_best {
                summary.best_op_chain = Some((chain.to_string(), rate));
            }
        } else {
            summary.totals.non_op_contracts += contracts;
        }

        summary.per_chain.push((
            chain.to_string(),
            ChainRunStats {
                contracts,
                lp_contracts,
                success_rate: rate,
                is_op_stack,
            },
        ));
    }

    summary.totals.overall_success_rate =
        success_rate(summary.totals.total_lp_contracts, summary.totals.total_contracts);

    summary
}

impl ScanSummary {
    pub fn chain(&self, name: &str) -> Option<&ChainRunStats> {
        self.per_chain
            .iter()
            .find(|(chain, _)| chain == name)
            .map(|(_, stats)| stats)
    }

    pub fn print(&self) {
        println!();
        println!("{}", style("═══ SCAN SUMMARY ═══").cyan().bold());

        for (chain, stats) in &self.per_chain {
            let tag = if stats.is_op_stack {
                style("OP").red()
            } else {
                style("L1/L2").dim()
            };
            println!(
                "  {:<10} [{:^5}] {:>4} contracts | {:>4} with LP | {:>5.1}%",
                chain.to_uppercase(),
                tag,
                stats.contracts,
                stats.lp_contracts,
                stats.success_rate
            );
        }

        println!();
        println!(
            "{} {} contracts, {} with liquidity ({:.1}%)",
            style("Σ").bold(),
            self.totals.total_contracts,
            self.totals.total_lp_contracts,
            self.totals.overall_success_rate
        );
        println!(
            "  OP Stack: {} | Other: {}",
            self.totals.op_stack_contracts, self.totals.non_op_contracts
        );

        match &self.best_op_chain {
            Some((chain, rate)) => println!(
                "{} Best OP Stack chain: {} ({:.1}% LP rate)",
                style("🏆").green(),
                style(chain.to_uppercase()).green().bold(),
                rate
            ),
            None => println!("{}", style("No OP Stack contracts found").yellow()),
        }
    }
}

// ============================================
// PERSISTED REPORT
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStats {
    pub total_contracts: usize,
    pub op_stack_contracts: usize,
    pub chains_scanned: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub scan_time: DateTime<Utc>,
    pub superchain_info: SuperchainSummary,
    pub chains: ScanResults,
    pub flattened: Vec<ContractFinding>,
    pub stats: ReportStats,
}

impl ScanReport {
    pub fn new(results: &ScanResults, registry: &ChainRegistry) -> Self {
        let flattened = results.flattened();
        let op_stack_contracts = flattened.iter().filter(|f| f.is_op_stack).count();

        Self {
            scan_time: Utc::now(),
            superchain_info: registry.superchain_summary(),
            stats: ReportStats {
                total_contracts: flattened.len(),
                op_stack_contracts,
                chains_scanned: results.chain_names(),
            },
            chains: results.clone(),
            flattened,
        }
    }

    /// Write as pretty JSON, creating parent directories as needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("creating {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).wrap_err_with(|| format!("writing {}", path.display()))?;

        info!(
            "✅ {} results saved to {}",
            self.stats.total_contracts,
            path.display()
        );
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))?;
        let report = serde_json::from_str(&content)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::{LiquidityStatus, TokenMetadata};
    use alloy_primitives::{Address, TxHash};

    fn finding(chain: &str, is_op_stack: bool, liquid: bool) -> ContractFinding {
        ContractFinding {
            chain: chain.to_string(),
            chain_id: 1,
            is_op_stack,
            block: 1,
            hash: TxHash::ZERO,
            deployer: Address::ZERO,
            contract_address: "0x0000000000000000000000000000000000000001".to_string(),
            timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            metadata: TokenMetadata::default(),
            lp_info: LiquidityStatus::from_checks(liquid, false),
            dex_data: None,
            explorer_url: String::new(),
        }
    }

    fn results(entries: Vec<(&str, Vec<ContractFinding>)>) -> ScanResults {
        entries
            .into_iter()
            .map(|(chain, findings)| (chain.to_string(), findings))
            .collect()
    }

    #[test]
    fn test_summary_rates() {
        let results = results(vec![
            ("base", vec![finding("base", true, true), finding("base", true, false)]),
            ("mode", vec![]),
        ]);
        let summary = summarize(&results, &ChainRegistry::default());

        let base = summary.chain("base").unwrap();
        assert_eq!(base.contracts, 2);
        assert_eq!(base.lp_contracts, 1);
        assert_eq!(base.success_rate, 50.0);

        let mode = summary.chain("mode").unwrap();
        assert_eq!(mode.contracts, 0);
        assert_eq!(mode.success_rate, 0.0);

        assert_eq!(summary.totals.total_contracts, 2);
        assert_eq!(summary.totals.overall_success_rate, 50.0);
        assert_eq!(summary.best_op_chain, Some(("base".to_string(), 50.0)));
    }

    #[test]
    fn test_op_stack_split() {
        let results = results(vec![
            ("optimism", vec![finding("optimism", true, false)]),
            ("ethereum", vec![finding("ethereum", false, true), finding("ethereum", false, true)]),
            ("made-up", vec![finding("made-up", false, false)]),
        ]);
        let summary = summarize(&results, &ChainRegistry::default());

        assert_eq!(summary.totals.op_stack_contracts, 1);
        assert_eq!(summary.totals.non_op_contracts, 3);
        assert!(!summary.chain("made-up").unwrap().is_op_stack);
        // zero rate still counts once something was found
        assert_eq!(summary.best_op_chain, Some(("optimism".to_string(), 0.0)));
    }

    #[test]
    fn test_best_chain_tie_goes_to_first() {
        let results = results(vec![
            ("zora", vec![finding("zora", true, true)]),
            ("base", vec![finding("base", true, true)]),
        ]);
        let summary = summarize(&results, &ChainRegistry::default());
        assert_eq!(summary.best_op_chain, Some(("zora".to_string(), 100.0)));
    }

    #[test]
    fn test_no_best_chain_without_op_contracts() {
        let results = results(vec![
            ("base", vec![]),
            ("arbitrum", vec![finding("arbitrum", false, true)]),
        ]);
        let summary = summarize(&results, &ChainRegistry::default());
        assert!(summary.best_op_chain.is_none());
        assert_eq!(summary.totals.overall_success_rate, 100.0);
    }

    #[test]
    fn test_report_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public").join("superchain_tokens.json");

        let results = results(vec![
            ("base", vec![finding("base", true, true)]),
            ("ethereum", vec![finding("ethereum", false, false)]),
            ("lisk", vec![]),
        ]);
        let report = ScanReport::new(&results, &ChainRegistry::default());
        report.save(&path).unwrap();

        let loaded = ScanReport::load(&path).unwrap();
        assert_eq!(loaded, report);
        assert_eq!(loaded.stats.total_contracts, 2);
        assert_eq!(loaded.stats.op_stack_contracts, 1);
        assert_eq!(loaded.stats.chains_scanned, vec!["base", "ethereum", "lisk"]);
        assert_eq!(loaded.flattened.len(), 2);
        assert_eq!(loaded.superchain_info.total_op_chains, 7);
        assert_eq!(
            summarize(&loaded.chains, &ChainRegistry::default()),
            summarize(&results, &ChainRegistry::default())
        );

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        for key in ["scan_time", "superchain_info", "chains", "flattened", "stats"] {
            assert!(raw.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(raw["chains"]["base"][0]["lp_info"]["status"], "present");
    }
}
