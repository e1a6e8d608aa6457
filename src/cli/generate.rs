//! Generate command implementation

use super::symbols_or;
use crate::config::Config;
use crate::generator::TickGenerator;
use crate::store::open_store;
use clap::Args;

/// Symbols seeded when none are given
const DEFAULT_SYMBOLS: [&str; 4] = ["btcusdt", "ethusdt", "adausdt", "solusdt"];

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Symbols to seed
    pub symbols: Vec<String>,

    /// Ticks per symbol (defaults to generator.history_points)
    #[arg(short, long)]
    pub points: Option<usize>,

    /// Seed for reproducible prices
    #[arg(long)]
    pub seed: Option<u64>,
}

impl GenerateArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let defaults: Vec<String> = DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect();
        let symbols = symbols_or(&self.symbols, &defaults);
        let points = self.points.unwrap_or(config.generator.history_points);

        let base_prices = config.generator.base_prices.clone();
        let mut generator = match self.seed {
            Some(seed) => TickGenerator::with_seed(base_prices, seed),
            None => TickGenerator::new(base_prices),
        };

        let store = open_store(&config.store)?;
        let written = generator.seed_history(store.as_ref(), &symbols, points)?;
        println!("Generated {} ticks for {} symbols", written, symbols.len());
        Ok(())
    }
}
