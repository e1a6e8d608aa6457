//! Stats command implementation

use crate::analytics::PairAnalytics;
use crate::config::Config;
use crate::store::open_store;
use clap::Args;
use serde_json::json;

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Symbols to summarize
    #[arg(required = true)]
    pub symbols: Vec<String>,

    /// Recent ticks per symbol (defaults to analytics.tick_limit)
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl StatsArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let store = open_store(&config.store)?;
        let limit = self.limit.unwrap_or(config.analytics.tick_limit);
        let analytics = PairAnalytics::new(store, config.analytics.clone());

        let stats: serde_json::Map<String, serde_json::Value> = self
            .symbols
            .iter()
            .map(|symbol| {
                let symbol = symbol.to_lowercase();
                let stats = analytics.symbol_stats(&symbol, limit);
                (symbol, json!(stats))
            })
            .collect();

        println!("{}", serde_json::to_string_pretty(&stats)?);
        Ok(())
    }
}
