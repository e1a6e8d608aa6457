//! CLI interface for pairwatch
//!
//! Provides subcommands for:
//! - `run`: Collect live trades from the exchange
//! - `simulate`: Collect synthetic trades through the same pipeline
//! - `generate`: Seed the store with synthetic history
//! - `analyze`: Pair analytics report
//! - `stats`: Per-symbol statistics
//! - `export`: Write stored ticks to a file
//! - `config`: Show effective configuration

mod analyze;
mod export;
mod generate;
mod run;
mod simulate;
mod stats;

pub use analyze::AnalyzeArgs;
pub use export::ExportArgs;
pub use generate::GenerateArgs;
pub use run::RunArgs;
pub use simulate::SimulateArgs;
pub use stats::StatsArgs;

use crate::alert::AlertEngine;
use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "pairwatch")]
#[command(about = "Streaming tick ingestion and pairs-trading analytics")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect live trades and print push events
    Run(RunArgs),
    /// Collect synthetic trades and print push events
    Simulate(SimulateArgs),
    /// Seed the store with synthetic history
    Generate(GenerateArgs),
    /// Compute pair analytics
    Analyze(AnalyzeArgs),
    /// Show per-symbol statistics
    Stats(StatsArgs),
    /// Export stored ticks
    Export(ExportArgs),
    /// Show effective configuration
    Config,
}

/// Alert engine preloaded with the configured rules
pub(crate) fn alert_engine(config: &Config) -> Arc<AlertEngine> {
    let engine = AlertEngine::new();
    for rule in &config.alerts {
        engine.create_alert(rule.name.clone(), rule.condition, &rule.symbol, rule.threshold);
    }
    Arc::new(engine)
}

/// Symbols from the command line, or the fallback when none were given
pub(crate) fn symbols_or(args: &[String], fallback: &[String]) -> Vec<String> {
    let source = if args.is_empty() { fallback } else { args };
    source.iter().map(|s| s.to_lowercase()).collect()
}
