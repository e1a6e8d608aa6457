//! Tick persistence
//!
//! Durable append and time-ordered queries of ticks per symbol. The core only
//! talks to [`TickStore`]; the backends are interchangeable.

mod memory;
mod sqlite;

pub use memory::MemoryTickStore;
pub use sqlite::SqliteTickStore;

use crate::config::{StoreBackend, StoreConfig};
use crate::feed::Tick;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Tick store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite failure
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored timestamp cannot be represented
    #[error("Corrupt timestamp in store: {0}")]
    CorruptTimestamp(i64),
}

/// Durable per-symbol tick storage.
///
/// Implementations serialize their own writes. All queries return ticks in
/// ascending timestamp order.
pub trait TickStore: Send + Sync {
    /// Append one tick
    fn save_tick(
        &self,
        symbol: &str,
        timestamp: DateTime<Utc>,
        price: f64,
        size: f64,
    ) -> Result<(), StoreError>;

    /// The most recent `limit` ticks for a symbol, oldest first
    fn get_recent_ticks(&self, symbol: &str, limit: usize) -> Result<Vec<Tick>, StoreError>;

    /// Ticks with `start <= timestamp <= end`, oldest first
    fn get_ticks_in_range(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Tick>, StoreError>;

    /// Append a normalized tick
    fn save(&self, tick: &Tick) -> Result<(), StoreError> {
        self.save_tick(&tick.symbol, tick.timestamp, tick.price, tick.size)
    }
}

/// Open the store selected by configuration
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn TickStore>, StoreError> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryTickStore::new())),
        StoreBackend::Sqlite => {
            if let Some(parent) = config.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Ok(Arc::new(SqliteTickStore::open(&config.path)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_memory_store() {
        let config = StoreConfig {
            backend: StoreBackend::Memory,
            ..Default::default()
        };
        let store = open_store(&config).unwrap();
        assert!(store.get_recent_ticks("btcusdt", 10).unwrap().is_empty());
    }

    #[test]
    fn test_open_sqlite_store_creates_parent_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("ticks.db");
        let config = StoreConfig {
            backend: StoreBackend::Sqlite,
            path: path.clone(),
        };

        let store = open_store(&config).unwrap();
        store
            .save(&Tick::new("btcusdt", Utc::now(), 100.0, 1.0))
            .unwrap();
        assert!(path.exists());
    }
}
