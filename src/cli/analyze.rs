//! Analyze command implementation

use crate::analytics::{AnalyticsRequest, PairAnalytics};
use crate::config::Config;
use crate::resample::Interval;
use crate::store::open_store;
use clap::Args;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Independent leg
    pub symbol1: String,

    /// Dependent leg
    pub symbol2: String,

    /// Bar width, e.g. 1s, 1m, 5m (defaults to analytics.default_timeframe)
    #[arg(short, long)]
    pub timeframe: Option<Interval>,

    /// Z-score and correlation window (defaults to analytics.default_window)
    #[arg(short, long)]
    pub window: Option<usize>,
}

impl AnalyzeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let store = open_store(&config.store)?;
        let analytics = PairAnalytics::new(store, config.analytics.clone());

        let request = AnalyticsRequest::new(&self.symbol1, &self.symbol2)
            .timeframe(self.timeframe.unwrap_or(config.analytics.default_timeframe))
            .window_size(self.window.unwrap_or(config.analytics.default_window));

        let report = analytics.analyze(&request);
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}
