//! Configuration types for pairwatch
//!
//! Every section has serde defaults, so an empty file is a valid
//! configuration equal to [`Config::default`].

use crate::alert::AlertCondition;
use crate::feed::BINANCE_WS_URL;
use crate::resample::Interval;
use crate::telemetry::LogFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// File is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range
    #[error("Invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub ingestion: IngestionConfig,
    pub store: StoreConfig,
    pub analytics: AnalyticsConfig,
    pub generator: GeneratorConfig,
    pub alerts: Vec<AlertRule>,
    pub telemetry: TelemetryConfig,
}

/// Trade feed configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// WebSocket base URL; `/<symbol>@trade` is appended per stream
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    /// Symbols collected by `run`
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Reconnect attempts after a transport failure (0 = never)
    #[serde(default)]
    pub max_reconnects: u32,

    /// Keepalive ping interval
    #[serde(default = "default_ping_interval_secs")]
    pub ping_interval_secs: u64,
}

fn default_ws_url() -> String {
    BINANCE_WS_URL.to_string()
}
fn default_symbols() -> Vec<String> {
    vec!["btcusdt".to_string(), "ethusdt".to_string()]
}
fn default_ping_interval_secs() -> u64 {
    30
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
            symbols: default_symbols(),
            max_reconnects: 0,
            ping_interval_secs: 30,
        }
    }
}

/// Buffering and feed worker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Maximum ticks held in the shared buffer
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    /// Period of the drain-and-publish worker
    #[serde(default = "default_drain_interval_ms")]
    pub drain_interval_ms: u64,

    /// Delay between starting consecutive feeds
    #[serde(default = "default_stagger_ms")]
    pub stagger_ms: u64,

    /// Time a worker gets to exit on stop before it is aborted
    #[serde(default = "default_stop_timeout_ms")]
    pub stop_timeout_ms: u64,
}

fn default_buffer_capacity() -> usize {
    1000
}
fn default_drain_interval_ms() -> u64 {
    500
}
fn default_stagger_ms() -> u64 {
    100
}
fn default_stop_timeout_ms() -> u64 {
    2000
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 1000,
            drain_interval_ms: 500,
            stagger_ms: 100,
            stop_timeout_ms: 2000,
        }
    }
}

impl IngestionConfig {
    pub fn drain_interval(&self) -> Duration {
        Duration::from_millis(self.drain_interval_ms)
    }

    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}

/// Tick store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

/// Tick store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Database file for the SQLite backend
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./data/ticks.db")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            path: default_store_path(),
        }
    }
}

/// Pair analytics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Recent ticks fetched per symbol for each computation
    #[serde(default = "default_tick_limit")]
    pub tick_limit: usize,

    /// Bar width when a request does not name one
    #[serde(default)]
    pub default_timeframe: Interval,

    /// Z-score and correlation window when a request does not name one
    #[serde(default = "default_window")]
    pub default_window: usize,
}

fn default_tick_limit() -> usize {
    500
}
fn default_window() -> usize {
    20
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            tick_limit: 500,
            default_timeframe: Interval::default(),
            default_window: 20,
        }
    }
}

/// Synthetic tick generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Period between live synthetic ticks
    #[serde(default = "default_generator_interval_ms")]
    pub interval_ms: u64,

    /// Ticks per symbol written by `generate`
    #[serde(default = "default_history_points")]
    pub history_points: usize,

    /// Reference price per symbol; unknown symbols use 100
    #[serde(default = "default_base_prices")]
    pub base_prices: BTreeMap<String, f64>,
}

fn default_generator_interval_ms() -> u64 {
    2000
}
fn default_history_points() -> usize {
    100
}
fn default_base_prices() -> BTreeMap<String, f64> {
    [
        ("btcusdt", 60_000.0),
        ("ethusdt", 3_500.0),
        ("adausdt", 0.45),
        ("solusdt", 150.0),
    ]
    .into_iter()
    .map(|(s, p)| (s.to_string(), p))
    .collect()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            history_points: 100,
            base_prices: default_base_prices(),
        }
    }
}

/// Alert created at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    pub name: String,
    pub condition: AlertCondition,
    pub symbol: String,
    pub threshold: f64,
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Prometheus scrape port; no exporter when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the runtime cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });

        if self.ingestion.buffer_capacity == 0 {
            return invalid("ingestion.buffer_capacity", "must be greater than zero");
        }
        if self.ingestion.drain_interval_ms == 0 {
            return invalid("ingestion.drain_interval_ms", "must be greater than zero");
        }
        if self.analytics.tick_limit == 0 {
            return invalid("analytics.tick_limit", "must be greater than zero");
        }
        if self.analytics.default_window == 0 {
            return invalid("analytics.default_window", "must be greater than zero");
        }
        if self.generator.interval_ms == 0 {
            return invalid("generator.interval_ms", "must be greater than zero");
        }
        if self.feed.ping_interval_secs == 0 {
            return invalid("feed.ping_interval_secs", "must be greater than zero");
        }
        Ok(())
    }
}
