//! pairwatch: streaming tick ingestion and pairs-trading analytics
//!
//! This library provides the core components for:
//! - Real-time trade feeds from Binance, normalized to ticks
//! - Supervised per-symbol streams with a bounded ingestion buffer
//! - Tick storage in SQLite or memory
//! - OHLCV resampling
//! - Hedge-ratio regression, spread z-score, ADF and rolling correlation
//! - Price alerts and a broadcast push channel
//! - Synthetic data for running offline
//! - Export to CSV, JSON and Parquet
//! - Structured logging and Prometheus metrics

pub mod alert;
pub mod analytics;
pub mod cli;
pub mod config;
pub mod data;
pub mod feed;
pub mod generator;
pub mod ingest;
pub mod observer;
pub mod push;
pub mod resample;
pub mod store;
pub mod telemetry;
pub mod ws;
