//! Tick export in CSV, JSON and Parquet

use super::parquet::write_parquet;
use super::ExportError;
use crate::feed::Tick;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Parquet,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Parquet => "parquet",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "parquet" => Ok(ExportFormat::Parquet),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    timestamp: String,
    symbol: &'a str,
    price: f64,
    size: f64,
}

/// Write ticks as CSV with header `timestamp,symbol,price,size`
pub fn write_csv<W: Write>(ticks: &[Tick], writer: W) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    if ticks.is_empty() {
        csv.write_record(["timestamp", "symbol", "price", "size"])?;
    }
    for tick in ticks {
        csv.serialize(CsvRow {
            timestamp: tick.timestamp.to_rfc3339(),
            symbol: &tick.symbol,
            price: tick.price,
            size: tick.size,
        })?;
    }
    csv.flush()?;
    Ok(())
}

/// Write ticks as a pretty-printed JSON array
pub fn write_json<W: Write>(ticks: &[Tick], writer: W) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, ticks)?;
    writer.flush()?;
    Ok(())
}

/// Write ticks to `path` in the given format, creating parent directories
pub fn export_ticks(ticks: &[Tick], format: ExportFormat, path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    match format {
        ExportFormat::Csv => write_csv(ticks, file)?,
        ExportFormat::Json => write_json(ticks, file)?,
        ExportFormat::Parquet => write_parquet(ticks, file)?,
    }

    tracing::info!(path = ?path, %format, count = ticks.len(), "Exported ticks");
    Ok(())
}

/// Default export path, e.g. `dir/ticks_btcusdt_20250104_123000.csv`
pub fn export_file_path(
    dir: &Path,
    symbol: &str,
    timestamp: DateTime<Utc>,
    format: ExportFormat,
) -> PathBuf {
    let filename = format!(
        "ticks_{}_{}.{}",
        symbol.to_lowercase(),
        timestamp.format("%Y%m%d_%H%M%S"),
        format.extension()
    );
    dir.join(filename)
}
