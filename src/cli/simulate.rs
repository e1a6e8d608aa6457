//! Simulate command implementation

use super::run::collect;
use super::symbols_or;
use crate::config::Config;
use crate::generator::{SyntheticConnector, TickGenerator};
use crate::store::open_store;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Symbols to simulate (defaults to feed.symbols)
    pub symbols: Vec<String>,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(short, long)]
    pub duration_secs: Option<u64>,

    /// Seed for reproducible prices
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write generator.history_points of history per symbol first
    #[arg(long)]
    pub with_history: bool,
}

impl SimulateArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let symbols = symbols_or(&self.symbols, &config.feed.symbols);
        let base_prices = config.generator.base_prices.clone();
        let mut generator = match self.seed {
            Some(seed) => TickGenerator::with_seed(base_prices, seed),
            None => TickGenerator::new(base_prices),
        };

        let store = open_store(&config.store)?;
        if self.with_history {
            generator.seed_history(store.as_ref(), &symbols, config.generator.history_points)?;
        }

        let connector = SyntheticConnector::new(
            generator,
            Duration::from_millis(config.generator.interval_ms),
        );
        collect(Arc::new(connector), store, config, &symbols, self.duration_secs).await
    }
}
