//! In-memory tick store

use super::{StoreError, TickStore};
use crate::feed::Tick;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Process-local store keeping each symbol's ticks sorted by time
#[derive(Debug, Default)]
pub struct MemoryTickStore {
    ticks: RwLock<HashMap<String, Vec<Tick>>>,
}

impl MemoryTickStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks held for a symbol
    pub fn len(&self, symbol: &str) -> usize {
        self.ticks.read().get(symbol).map_or(0, Vec::len)
    }
}

impl TickStore for MemoryTickStore {
    fn save_tick(
        &self,
        symbol: &str,
        timestamp: DateTime<Utc>,
        price: f64,
        size: f64,
    ) -> Result<(), StoreError> {
        let mut ticks = self.ticks.write();
        let series = ticks.entry(symbol.to_string()).or_default();
        // Equal timestamps keep arrival order
        let at = series.partition_point(|t| t.timestamp <= timestamp);
        series.insert(at, Tick::new(symbol, timestamp, price, size));
        Ok(())
    }

    fn get_recent_ticks(&self, symbol: &str, limit: usize) -> Result<Vec<Tick>, StoreError> {
        let ticks = self.ticks.read();
        let Some(series) = ticks.get(symbol) else {
            return Ok(Vec::new());
        };
        let from = series.len().saturating_sub(limit);
        Ok(series[from..].to_vec())
    }

    fn get_ticks_in_range(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Tick>, StoreError> {
        let ticks = self.ticks.read();
        let Some(series) = ticks.get(symbol) else {
            return Ok(Vec::new());
        };
        let from = series.partition_point(|t| t.timestamp < start);
        let to = series.partition_point(|t| t.timestamp <= end);
        Ok(series.get(from..to).map(<[Tick]>::to_vec).unwrap_or_default())
    }
}
