//! Export command implementation

use crate::config::Config;
use crate::data::{export_file_path, export_ticks, ExportFormat};
use crate::store::open_store;
use chrono::{DateTime, Utc};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Symbol to export
    pub symbol: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    /// Output file (defaults to a timestamped file in --dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for the default output file
    #[arg(long, default_value = "./exports")]
    pub dir: PathBuf,

    /// Most recent ticks to export when no range is given
    #[arg(short, long, default_value_t = 10_000)]
    pub limit: usize,

    /// Range start (RFC 3339); exports a time range instead of recent ticks
    #[arg(long)]
    pub start: Option<DateTime<Utc>>,

    /// Range end (RFC 3339), defaults to now
    #[arg(long, requires = "start")]
    pub end: Option<DateTime<Utc>>,
}

impl ExportArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let store = open_store(&config.store)?;
        let symbol = self.symbol.to_lowercase();

        let ticks = match self.start {
            Some(start) => {
                let end = self.end.unwrap_or_else(Utc::now);
                store.get_ticks_in_range(&symbol, start, end)?
            }
            None => store.get_recent_ticks(&symbol, self.limit)?,
        };

        let path = self
            .output
            .clone()
            .unwrap_or_else(|| export_file_path(&self.dir, &symbol, Utc::now(), self.format));
        export_ticks(&ticks, self.format, &path)?;

        println!("Exported {} ticks to {}", ticks.len(), path.display());
        Ok(())
    }
}
