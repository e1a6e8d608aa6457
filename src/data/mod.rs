//! Tick export
//!
//! Writes stored ticks to CSV, JSON or Parquet files.

mod export;
mod parquet;

pub use self::export::{
    export_file_path, export_ticks, write_csv, write_json, ExportFormat,
};
pub use self::parquet::{read_parquet_ticks, tick_schema, write_parquet};

use thiserror::Error;

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] ::parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    /// Column missing or of an unexpected type
    #[error("Invalid {0} column")]
    InvalidColumn(&'static str),
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),
}
