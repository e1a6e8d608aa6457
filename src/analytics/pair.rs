//! Store-backed pair analytics

use super::adf::adf_test;
use super::correlation::correlate;
use super::regression::regress;
use super::series::{join_closes, JoinedSeries};
use super::stats::symbol_stats_from_ticks;
use super::types::{
    AdfSummary, AnalyticsReport, AnalyticsRequest, CorrelationResult, CorrelationSummary,
    RegressionOutcome, SpreadSummary, SymbolStats, ZScoreSummary,
};
use super::zscore::calculate_spread_zscore;
use crate::config::AnalyticsConfig;
use crate::feed::Tick;
use crate::resample::{resample, Interval, OhlcvBar};
use crate::store::TickStore;
use crate::telemetry::{record_latency, LatencyMetric};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Computes pair statistics from the most recent stored ticks.
///
/// Never fails: store errors are logged and treated as an empty history,
/// which yields the documented sentinel results.
pub struct PairAnalytics {
    store: Arc<dyn TickStore>,
    config: AnalyticsConfig,
}

impl PairAnalytics {
    pub fn new(store: Arc<dyn TickStore>, config: AnalyticsConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Regress symbol2 closes on symbol1 closes
    pub fn pairwise_regression(
        &self,
        symbol1: &str,
        symbol2: &str,
        timeframe: Interval,
    ) -> RegressionOutcome {
        let joined = self.joined(symbol1, symbol2, timeframe);
        regress(&joined.x, &joined.y)
    }

    /// Rolling correlation of the two symbols' closes
    pub fn rolling_correlation(
        &self,
        symbol1: &str,
        symbol2: &str,
        window: usize,
        timeframe: Interval,
    ) -> CorrelationResult {
        let joined = self.joined(symbol1, symbol2, timeframe);
        correlate(&joined.x, &joined.y, window)
    }

    /// Regression, spread z-score, ADF and correlation in one pass
    pub fn analyze(&self, request: &AnalyticsRequest) -> AnalyticsReport {
        let started = Instant::now();
        let joined = self.joined(&request.symbol1, &request.symbol2, request.timeframe);

        let outcome = regress(&joined.x, &joined.y);
        let regression = outcome.result();
        let spread = joined.spread(regression.hedge_ratio);
        let zscore = calculate_spread_zscore(&spread, request.window_size);
        let adf = adf_test(&spread);
        let correlation = correlate(&joined.x, &joined.y, request.window_size);

        record_latency(LatencyMetric::Analytics, started.elapsed());
        debug!(
            symbol1 = %request.symbol1,
            symbol2 = %request.symbol2,
            timeframe = %request.timeframe,
            joined = joined.len(),
            fit = ?outcome.quality(),
            "Pair analytics computed"
        );

        AnalyticsReport {
            symbol1: request.symbol1.to_lowercase(),
            symbol2: request.symbol2.to_lowercase(),
            timeframe: request.timeframe,
            fit: outcome.quality(),
            joined_bars: joined.len(),
            hedge_ratio: regression.hedge_ratio,
            r_squared: regression.r_squared,
            spread: SpreadSummary {
                current_spread: regression.current_spread,
                mean: regression.spread_mean,
                std: regression.spread_std,
            },
            zscore: ZScoreSummary {
                current_zscore: zscore.current_zscore,
                mean: zscore.mean,
                std: zscore.std,
            },
            adf: AdfSummary {
                test_statistic: adf.test_statistic,
                p_value: adf.p_value,
                is_stationary: adf.is_stationary,
            },
            correlation: CorrelationSummary {
                current_correlation: correlation.current_correlation,
                mean_correlation: correlation.mean_correlation,
            },
        }
    }

    /// Descriptive statistics over the latest `limit` ticks
    pub fn symbol_stats(&self, symbol: &str, limit: usize) -> SymbolStats {
        symbol_stats_from_ticks(&self.recent_ticks(symbol, limit))
    }

    /// Resampled bars of the latest `tick_limit` ticks
    pub fn bars(&self, symbol: &str, timeframe: Interval) -> Vec<OhlcvBar> {
        resample(&self.recent_ticks(symbol, self.config.tick_limit), timeframe)
    }

    fn joined(&self, symbol1: &str, symbol2: &str, timeframe: Interval) -> JoinedSeries {
        join_closes(
            &self.bars(symbol1, timeframe),
            &self.bars(symbol2, timeframe),
        )
    }

    fn recent_ticks(&self, symbol: &str, limit: usize) -> Vec<Tick> {
        let symbol = symbol.to_lowercase();
        match self.store.get_recent_ticks(&symbol, limit) {
            Ok(ticks) => ticks,
            Err(e) => {
                warn!(%symbol, error = %e, "Failed to load ticks, treating as empty");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::types::{FitQuality, DEGENERATE_REGRESSION, LOW_CONFIDENCE_REGRESSION};
    use crate::store::{MemoryTickStore, StoreError};
    use chrono::{DateTime, Duration, Utc};

    fn base() -> DateTime<Utc> {
        DateTime::from_timestamp(1_704_067_200, 0).unwrap()
    }

    /// One tick per minute for each price
    fn seed(store: &MemoryTickStore, symbol: &str, prices: &[f64]) {
        for (i, p) in prices.iter().enumerate() {
            store
                .save_tick(symbol, base() + Duration::minutes(i as i64), *p, 1.0)
                .unwrap();
        }
    }

    fn analytics(store: Arc<MemoryTickStore>) -> PairAnalytics {
        PairAnalytics::new(store, AnalyticsConfig::default())
    }

    #[test]
    fn test_fitted_regression_through_store() {
        let store = Arc::new(MemoryTickStore::new());
        let x: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 10.0).collect();
        seed(&store, "btcusdt", &x);
        seed(&store, "ethusdt", &y);

        let outcome = analytics(store).pairwise_regression("BTCUSDT", "ethusdt", Interval::minutes(1));
        let r = outcome.result();
        assert!(outcome.is_fitted());
        assert!((r.hedge_ratio - 2.0).abs() < 1e-9);
        assert!((r.r_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_price1_is_degenerate() {
        let store = Arc::new(MemoryTickStore::new());
        seed(&store, "btcusdt", &[100.0; 10]);
        seed(&store, "ethusdt", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);

        let outcome = analytics(store).pairwise_regression("btcusdt", "ethusdt", Interval::minutes(1));
        assert_eq!(outcome, RegressionOutcome::Degenerate);
        assert_eq!(outcome.result(), DEGENERATE_REGRESSION);
    }

    #[test]
    fn test_few_joined_bars_is_low_confidence() {
        let store = Arc::new(MemoryTickStore::new());
        // Five ticks each, three shared minutes
        for (i, p) in [1.0, 2.0, 3.0, 4.0, 5.0].iter().enumerate() {
            let offset = Duration::seconds(10 * i as i64);
            store.save_tick("btcusdt", base() + offset, *p, 1.0).unwrap();
            store.save_tick("ethusdt", base() + offset, *p * 2.0, 1.0).unwrap();
        }
        for m in 1..=2 {
            store
                .save_tick("btcusdt", base() + Duration::minutes(m), 3.0 + m as f64, 1.0)
                .unwrap();
            store
                .save_tick("ethusdt", base() + Duration::minutes(m), 6.0 + m as f64, 1.0)
                .unwrap();
        }

        let outcome = analytics(store).pairwise_regression("btcusdt", "ethusdt", Interval::minutes(1));
        assert_eq!(outcome.result(), LOW_CONFIDENCE_REGRESSION);
    }

    #[test]
    fn test_empty_store_gives_sentinels() {
        let analytics = analytics(Arc::new(MemoryTickStore::new()));
        let report = analytics.analyze(&AnalyticsRequest::new("btcusdt", "ethusdt"));

        assert_eq!(report.fit, FitQuality::Degenerate);
        assert_eq!(report.hedge_ratio, 1.0);
        assert_eq!(report.r_squared, 0.5);
        assert_eq!(report.zscore.std, 1.0);
        assert_eq!(report.adf.p_value, 1.0);
        assert!(!report.adf.is_stationary);
        assert_eq!(report.correlation.current_correlation, 0.0);
    }

    #[test]
    fn test_store_errors_are_treated_as_empty() {
        struct BrokenStore;
        impl TickStore for BrokenStore {
            fn save_tick(&self, _: &str, _: DateTime<Utc>, _: f64, _: f64) -> Result<(), StoreError> {
                Ok(())
            }
            fn get_recent_ticks(&self, _: &str, _: usize) -> Result<Vec<Tick>, StoreError> {
                Err(StoreError::CorruptTimestamp(-1))
            }
            fn get_ticks_in_range(
                &self,
                _: &str,
                _: DateTime<Utc>,
                _: DateTime<Utc>,
            ) -> Result<Vec<Tick>, StoreError> {
                Err(StoreError::CorruptTimestamp(-1))
            }
        }

        let analytics = PairAnalytics::new(Arc::new(BrokenStore), AnalyticsConfig::default());
        assert_eq!(
            analytics.pairwise_regression("a", "b", Interval::minutes(1)),
            RegressionOutcome::Degenerate
        );
        assert_eq!(analytics.symbol_stats("a", 100), SymbolStats::default());
    }

    #[test]
    fn test_analyze_cointegrated_pair() {
        let store = Arc::new(MemoryTickStore::new());
        // Trending leg plus a bounded, noisy spread
        let mut level = 100.0;
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..200 {
            level += 0.2 + ((i * 7919) % 13) as f64 / 13.0 - 0.5;
            let noise = ((i * 104_729) % 17) as f64 / 17.0 - 0.5;
            x.push(level);
            y.push(1.5 * level + 0.8 * ((i as f64) * 1.3).sin() + noise);
        }
        seed(&store, "btcusdt", &x);
        seed(&store, "ethusdt", &y);

        let report = analytics(store).analyze(
            &AnalyticsRequest::new("btcusdt", "ethusdt").window_size(30),
        );
        assert_eq!(report.fit, FitQuality::Fitted);
        assert_eq!(report.joined_bars, 200);
        assert!((report.hedge_ratio - 1.5).abs() < 0.1);
        assert!(report.adf.is_stationary);
        assert!(report.correlation.current_correlation > 0.5);
    }

    #[test]
    fn test_rolling_correlation_requires_window() {
        let store = Arc::new(MemoryTickStore::new());
        seed(&store, "btcusdt", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        seed(&store, "ethusdt", &[2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);
        let analytics = analytics(store);

        let result = analytics.rolling_correlation("btcusdt", "ethusdt", 10, Interval::minutes(1));
        assert_eq!(result, CorrelationResult::empty());

        let result = analytics.rolling_correlation("btcusdt", "ethusdt", 3, Interval::minutes(1));
        assert!((result.current_correlation - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_symbol_stats_uses_recent_ticks() {
        let store = Arc::new(MemoryTickStore::new());
        seed(&store, "solusdt", &[1.0, 150.0, 152.0, 148.0]);
        let stats = analytics(store).symbol_stats("solusdt", 3);
        assert_eq!(stats.tick_count, 3);
        assert_eq!(stats.low, 148.0);
        assert_eq!(stats.current_price, 148.0);
    }
}
