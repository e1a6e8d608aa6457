//! Random tick generation

use crate::feed::Tick;
use crate::store::{StoreError, TickStore};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::info;

/// Price used for symbols without a configured base
pub const DEFAULT_BASE_PRICE: f64 = 100.0;

/// Relative half-width of historical price noise
const HISTORY_JITTER: f64 = 0.01;
/// Relative half-width of live price noise
const LIVE_JITTER: f64 = 0.005;

/// Ticks scattered uniformly around a fixed base price per symbol
#[derive(Debug, Clone)]
pub struct TickGenerator {
    rng: StdRng,
    base_prices: BTreeMap<String, f64>,
}

impl TickGenerator {
    /// Generator seeded from the OS
    pub fn new(base_prices: BTreeMap<String, f64>) -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            base_prices,
        }
    }

    /// Deterministic generator
    pub fn with_seed(base_prices: BTreeMap<String, f64>, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base_prices,
        }
    }

    pub fn base_price(&self, symbol: &str) -> f64 {
        self.base_prices
            .get(&symbol.to_lowercase())
            .copied()
            .unwrap_or(DEFAULT_BASE_PRICE)
    }

    /// `points` ticks one minute apart, the last at `end`.
    ///
    /// Prices fall within ±1% of the base, sizes in [0.1, 5.0).
    pub fn history(&mut self, symbol: &str, points: usize, end: DateTime<Utc>) -> Vec<Tick> {
        let symbol = symbol.to_lowercase();
        let base = self.base_price(&symbol);
        (0..points)
            .map(|i| {
                let minutes_back = (points - 1 - i) as i64;
                let price = base * (1.0 + self.rng.random_range(-HISTORY_JITTER..HISTORY_JITTER));
                let size = self.rng.random_range(0.1..5.0);
                Tick::new(symbol.clone(), end - Duration::minutes(minutes_back), price, size)
            })
            .collect()
    }

    /// Write `points` historical ticks per symbol, ending now.
    ///
    /// Returns the number of ticks written.
    pub fn seed_history(
        &mut self,
        store: &dyn TickStore,
        symbols: &[String],
        points: usize,
    ) -> Result<usize, StoreError> {
        let end = Utc::now();
        let mut written = 0;
        for symbol in symbols {
            for tick in self.history(symbol, points, end) {
                store.save(&tick)?;
                written += 1;
            }
        }
        info!(symbols = symbols.len(), ticks = written, "Seeded synthetic history");
        Ok(written)
    }

    /// One live tick stamped now: price within ±0.5% of the base, size in [0.1, 2.0)
    pub fn next_tick(&mut self, symbol: &str) -> Tick {
        let base = self.base_price(symbol);
        let price = base * (1.0 + self.rng.random_range(-LIVE_JITTER..LIVE_JITTER));
        let size = self.rng.random_range(0.1..2.0);
        Tick::new(symbol.to_lowercase(), Utc::now(), price, size)
    }

    /// One live tick per symbol
    pub fn next_ticks(&mut self, symbols: &[String]) -> Vec<Tick> {
        symbols.iter().map(|s| self.next_tick(s)).collect()
    }
}
