//! Superscan - Multi-Chain New Token Scanner
//!
//! Run with: cargo run
//!
//! Default run (no selection flags):
//! 1. Superchain scan of every OP Stack chain -> superchain_tokens.json
//! 2. Comparison scan of base, optimism, mode, ethereum, arbitrum
//!    -> multichain_comparison.json

use clap::Parser;
use color_eyre::eyre::Result;
use console::style;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use superscan::{summarize, ChainRegistry, ScanOrchestrator, ScanReport, ScanResults, ScannerConfig};

const SUPERCHAIN_REPORT: &str = "superchain_tokens.json";
const COMPARISON_REPORT: &str = "multichain_comparison.json";
const CUSTOM_REPORT: &str = "scan_results.json";

#[derive(Parser, Debug)]
#[command(version, about = "Scan recent blocks on EVM chains for new tokens with liquidity")]
struct Args {
    /// Chains to scan (comma-separated, e.g. base,mode,zora)
    #[arg(long, conflicts_with = "superchain")]
    chains: Option<String>,

    /// Scan every OP Stack chain
    #[arg(long)]
    superchain: bool,

    /// Blocks to scan per chain (on top of the head block)
    #[arg(long)]
    blocks: Option<u64>,

    /// Report file (relative paths land in the output directory)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Path to a TOML config file (defaults to environment / .env)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scan chains concurrently
    #[arg(long)]
    parallel: bool,
}

impl Args {
    /// `--chains` with the same trimming and casing as COMPARISON_CHAINS
    fn selected_chains(&self) -> Option<Vec<String>> {
        self.chains.as_deref().map(ScannerConfig::parse_chain_list)
    }
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(" 🔴 SUPERSCAN - Multi-Chain New Token Scanner").cyan().bold()
    );
    println!(
        "{}",
        style("    OP Stack Superchain | Uniswap V2/V3 | DexScreener").cyan()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

fn report_path(config: &ScannerConfig, output: Option<&Path>, default_name: &str) -> PathBuf {
    match output {
        Some(path) if path.is_absolute() || path.components().count() > 1 => path.to_path_buf(),
        Some(path) => config.output_path(&path.to_string_lossy()),
        None => config.output_path(default_name),
    }
}

/// Summarize, print and persist one scan phase
fn finish_phase(results: &ScanResults, registry: &ChainRegistry, path: &Path) -> Result<()> {
    summarize(results, registry).print();

    ScanReport::new(results, registry).save(path)?;
    println!(
        "{} Saved {} contracts to {}",
        style("✓").green(),
        results.total_findings(),
        path.display()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("superscan=info".parse()?),
        )
        .init();

    let args = Args::parse();

    print_banner();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => ScannerConfig::from_file(path)?,
        None => ScannerConfig::from_env()?,
    };
    if args.parallel {
        config.parallel_chains = true;
    }

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        error!("Please check your .env file or --config");
        return Err(e);
    }

    config.print_summary();
    println!();

    let registry = Arc::new(ChainRegistry::builtin().with_rpc_overrides(&config.rpc_overrides));
    let orchestrator = ScanOrchestrator::from_config(&config, registry.clone())?;
    let start = Instant::now();

    if let Some(chains) = args.selected_chains() {
        let blocks = args.blocks.unwrap_or(config.comparison_block_count);
        println!(
            "{}",
            style(format!("═══ SCAN: {} ═══", chains.join(", ").to_uppercase())).blue().bold()
        );

        let results = orchestrator.scan_chains(&chains, blocks).await;
        let path = report_path(&config, args.output.as_deref(), CUSTOM_REPORT);
        finish_phase(&results, &registry, &path)?;
    } else if args.superchain {
        let blocks = args.blocks.unwrap_or(config.superchain_block_count);
        println!("{}", style("═══ SUPERCHAIN SCAN ═══").red().bold());

        let results = orchestrator.scan_superchain(blocks).await;
        let path = report_path(&config, args.output.as_deref(), SUPERCHAIN_REPORT);
        finish_phase(&results, &registry, &path)?;
    } else {
        // =============================================
        // PHASE 1: SUPERCHAIN
        // =============================================
        println!();
        println!("{}", style("═══ PHASE 1: OP STACK SUPERCHAIN ═══").red().bold());
        println!();

        let blocks = args.blocks.unwrap_or(config.superchain_block_count);
        let superchain = orchestrator.scan_superchain(blocks).await;
        finish_phase(&superchain, &registry, &config.output_path(SUPERCHAIN_REPORT))?;

        // =============================================
        // PHASE 2: MULTI-CHAIN COMPARISON
        // =============================================
        println!();
        println!("{}", style("═══ PHASE 2: MULTI-CHAIN COMPARISON ═══").blue().bold());
        println!();

        let blocks = args.blocks.unwrap_or(config.comparison_block_count);
        let comparison = orchestrator
            .scan_chains(&config.comparison_chains, blocks)
            .await;
        finish_phase(&comparison, &registry, &config.output_path(COMPARISON_REPORT))?;
    }

    println!();
    println!(
        "{} Done in {:.1}s",
        style("✓").green().bold(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
