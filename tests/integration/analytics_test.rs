//! Integration tests for pair analytics over a store

use chrono::{DateTime, Duration, Utc};
use pairwatch::analytics::{AnalyticsRequest, FitQuality, PairAnalytics};
use pairwatch::config::AnalyticsConfig;
use pairwatch::resample::Interval;
use pairwatch::store::{MemoryTickStore, TickStore};
use std::sync::Arc;

fn start() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-01-04T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// `y = 2x + 10` plus a small wobble, one tick per second for each leg
fn hedged_store(points: usize) -> Arc<MemoryTickStore> {
    let store = Arc::new(MemoryTickStore::new());
    for i in 0..points {
        let t = i as f64;
        let ts = start() + Duration::seconds(i as i64);
        let x = 100.0 + 0.5 * t + 2.0 * (0.7 * t).sin();
        let y = 2.0 * x + 10.0 + 0.3 * (1.9 * t).sin();
        store.save_tick("btcusdt", ts, x, 1.0).unwrap();
        store.save_tick("ethusdt", ts, y, 1.0).unwrap();
    }
    store
}

#[test]
fn test_analyze_recovers_hedge_ratio() {
    let analytics = PairAnalytics::new(hedged_store(120), AnalyticsConfig::default());
    let request = AnalyticsRequest::new("BTCUSDT", "ethusdt")
        .timeframe(Interval::seconds(1))
        .window_size(20);

    let report = analytics.analyze(&request);
    assert_eq!(report.symbol1, "btcusdt");
    assert_eq!(report.fit, FitQuality::Fitted);
    assert_eq!(report.joined_bars, 120);
    assert!((report.hedge_ratio - 2.0).abs() < 0.05, "{}", report.hedge_ratio);
    assert!(report.r_squared > 0.99);
    assert!(report.spread.std < 1.0);
    assert!((0.0..=1.0).contains(&report.adf.p_value));
    assert!(report.correlation.current_correlation > 0.9);
}

#[test]
fn test_analyze_coarser_timeframe() {
    let analytics = PairAnalytics::new(hedged_store(120), AnalyticsConfig::default());
    let request = AnalyticsRequest::new("btcusdt", "ethusdt").timeframe(Interval::seconds(10));

    let report = analytics.analyze(&request);
    assert_eq!(report.joined_bars, 12);
    assert_eq!(report.fit, FitQuality::Fitted);
}

#[test]
fn test_analyze_missing_leg_is_degenerate() {
    let analytics = PairAnalytics::new(hedged_store(30), AnalyticsConfig::default());
    let request = AnalyticsRequest::new("btcusdt", "solusdt").timeframe(Interval::seconds(1));

    let report = analytics.analyze(&request);
    assert_eq!(report.joined_bars, 0);
    assert_eq!(report.fit, FitQuality::Degenerate);
    assert_eq!(report.hedge_ratio, 1.0);
    assert!(!report.adf.is_stationary);
}

#[test]
fn test_bars_and_stats() {
    let analytics = PairAnalytics::new(hedged_store(60), AnalyticsConfig::default());

    let bars = analytics.bars("btcusdt", Interval::minutes(1));
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].volume, 60.0);

    let stats = analytics.symbol_stats("btcusdt", 1000);
    assert_eq!(stats.tick_count, 60);
    assert_eq!(stats.volume, 60.0);
    assert!(stats.high >= stats.low);
}
