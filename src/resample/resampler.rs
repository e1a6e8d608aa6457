//! Tick to OHLCV resampling

use super::types::{Interval, OhlcvBar};
use crate::feed::Tick;

/// Below this many ticks a series is too thin to resample
pub const MIN_RESAMPLE_TICKS: usize = 5;

/// Resample a tick series into fixed-interval bars.
///
/// Returns an empty vector when fewer than [`MIN_RESAMPLE_TICKS`] ticks are
/// given. Otherwise identical to [`resample_unchecked`].
pub fn resample(ticks: &[Tick], interval: Interval) -> Vec<OhlcvBar> {
    if ticks.len() < MIN_RESAMPLE_TICKS {
        return Vec::new();
    }
    resample_unchecked(ticks, interval)
}

/// Resample without the minimum tick requirement.
///
/// Every bucket uses the same rule regardless of input size: open is the
/// first tick, high the max, low the min, close the last tick and volume the
/// sum of sizes. Empty buckets are omitted. Ticks are ordered stably by
/// timestamp first, so `bucket_start` is strictly increasing in the output.
pub fn resample_unchecked(ticks: &[Tick], interval: Interval) -> Vec<OhlcvBar> {
    let mut ordered: Vec<&Tick> = ticks.iter().collect();
    ordered.sort_by_key(|t| t.timestamp);

    let mut bars: Vec<OhlcvBar> = Vec::new();
    for tick in ordered {
        let bucket_start = interval.bucket_start(tick.timestamp);
        match bars.last_mut() {
            Some(bar) if bar.bucket_start == bucket_start => {
                bar.high = bar.high.max(tick.price);
                bar.low = bar.low.min(tick.price);
                bar.close = tick.price;
                bar.volume += tick.size;
            }
            _ => bars.push(OhlcvBar {
                symbol: tick.symbol.clone(),
                interval,
                bucket_start,
                open: tick.price,
                high: tick.price,
                low: tick.price,
                close: tick.price,
                volume: tick.size,
            }),
        }
    }
    bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn at(hms: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(&format!("2024-01-01T{hms}Z"))
            .unwrap()
            .with_timezone(&Utc)
    }

    fn tick(hms: &str, price: f64, size: f64) -> Tick {
        Tick::new("btcusdt", at(hms), price, size)
    }

    #[test]
    fn test_three_tick_example() {
        let ticks = vec![
            tick("10:00:01", 100.0, 1.0),
            tick("10:00:30", 102.0, 2.0),
            tick("10:01:10", 101.0, 0.5),
        ];

        let bars = resample_unchecked(&ticks, Interval::minutes(1));
        assert_eq!(bars.len(), 2);

        assert_eq!(bars[0].bucket_start, at("10:00:00"));
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 102.0);
        assert_eq!(bars[0].low, 100.0);
        assert_eq!(bars[0].close, 102.0);
        assert_eq!(bars[0].volume, 3.0);

        assert_eq!(bars[1].bucket_start, at("10:01:00"));
        assert_eq!(bars[1].open, 101.0);
        assert_eq!(bars[1].high, 101.0);
        assert_eq!(bars[1].low, 101.0);
        assert_eq!(bars[1].close, 101.0);
        assert_eq!(bars[1].volume, 0.5);
    }

    #[test]
    fn test_normalized_tick_round_trips_to_one_bar() {
        let frame = r#"{"e":"trade","E":1704103230250,"s":"ETHUSDT","p":"2250.75","q":"0.4"}"#;
        let tick = crate::feed::parse_feed_message(frame).unwrap().unwrap();

        for interval in ["1s", "15s", "1m", "5m", "1h"] {
            let interval: Interval = interval.parse().unwrap();
            let bars = resample_unchecked(std::slice::from_ref(&tick), interval);
            assert_eq!(bars.len(), 1, "{interval}");

            let bar = &bars[0];
            assert_eq!(bar.symbol, "ethusdt");
            assert_eq!(bar.bucket_start, interval.bucket_start(tick.timestamp));
            assert_eq!(bar.open, tick.price);
            assert_eq!(bar.high, tick.price);
            assert_eq!(bar.low, tick.price);
            assert_eq!(bar.close, tick.price);
            assert_eq!(bar.volume, tick.size);
        }
    }

    #[test]
    fn test_fewer_than_five_ticks_is_empty() {
        let ticks = vec![
            tick("10:00:01", 100.0, 1.0),
            tick("10:00:30", 102.0, 2.0),
            tick("10:01:10", 101.0, 0.5),
            tick("10:01:20", 101.5, 0.5),
        ];
        assert!(resample(&ticks, Interval::minutes(1)).is_empty());
    }

    #[test]
    fn test_five_ticks_resample() {
        let ticks = vec![
            tick("10:00:01", 100.0, 1.0),
            tick("10:00:20", 99.0, 1.0),
            tick("10:00:30", 102.0, 2.0),
            tick("10:01:10", 101.0, 0.5),
            tick("10:01:50", 103.0, 0.25),
        ];
        let bars = resample(&ticks, Interval::minutes(1));
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].low, 99.0);
        assert_eq!(bars[0].close, 102.0);
        assert_eq!(bars[1].open, 101.0);
        assert_eq!(bars[1].close, 103.0);
        assert_eq!(bars[1].volume, 0.75);
    }

    #[test]
    fn test_small_and_large_inputs_agree_on_bucket() {
        let bucket = vec![
            tick("10:00:01", 100.0, 1.0),
            tick("10:00:10", 105.0, 1.0),
            tick("10:00:20", 95.0, 1.0),
            tick("10:00:30", 101.0, 1.0),
            tick("10:00:40", 99.0, 1.0),
        ];
        let mut large = bucket.clone();
        for i in 0..10 {
            large.push(tick(&format!("10:05:{:02}", i), 200.0, 1.0));
        }

        let small_bars = resample(&bucket, Interval::minutes(1));
        let large_bars = resample(&large, Interval::minutes(1));
        assert_eq!(small_bars[0], large_bars[0]);
    }

    #[test]
    fn test_empty_buckets_are_dropped() {
        let ticks = vec![
            tick("10:00:01", 1.0, 1.0),
            tick("10:00:02", 1.0, 1.0),
            tick("10:00:03", 1.0, 1.0),
            tick("10:07:00", 2.0, 1.0),
            tick("10:07:01", 2.0, 1.0),
        ];
        let bars = resample(&ticks, Interval::minutes(1));
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].bucket_start, at("10:07:00"));
    }

    #[test]
    fn test_unordered_input_yields_increasing_buckets() {
        let ticks = vec![
            tick("10:02:00", 3.0, 1.0),
            tick("10:00:00", 1.0, 1.0),
            tick("10:01:00", 2.0, 1.0),
            tick("10:00:30", 1.5, 1.0),
            tick("10:02:30", 3.5, 1.0),
        ];
        let bars = resample(&ticks, Interval::minutes(1));
        assert!(bars
            .windows(2)
            .all(|w| w[0].bucket_start < w[1].bucket_start));
        assert_eq!(bars[0].open, 1.0);
        assert_eq!(bars[0].close, 1.5);
    }

    #[test]
    fn test_second_intervals() {
        let ticks: Vec<Tick> = (0..10)
            .map(|i| tick(&format!("10:00:{:02}", i), 100.0 + i as f64, 1.0))
            .collect();
        let bars = resample(&ticks, Interval::seconds(5));
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].close, 104.0);
        assert_eq!(bars[1].volume, 5.0);
    }
}
