//! Rolling spread z-score

use super::series::mean_std;
use super::types::ZScoreResult;

/// Shortest series that gets a z-score
pub const MIN_ZSCORE_POINTS: usize = 5;

/// Z-score of the latest value against its trailing window.
///
/// Uses population statistics over the last `min(window, len)` values. An
/// effective window below two scores zero with statistics over all data; a
/// window with zero deviation scores zero.
pub fn calculate_spread_zscore(series: &[f64], window: usize) -> ZScoreResult {
    if series.len() < MIN_ZSCORE_POINTS {
        return ZScoreResult::insufficient();
    }

    let window = window.min(series.len());
    if window < 2 {
        let (mean, std) = mean_std(series);
        return ZScoreResult {
            current_zscore: 0.0,
            mean,
            std,
            zscore_series: Vec::new(),
        };
    }

    let zscore_series: Vec<f64> = series
        .windows(window)
        .map(|w| {
            let (mean, std) = mean_std(w);
            score(w[w.len() - 1], mean, std)
        })
        .collect();

    let (mean, std) = mean_std(&series[series.len() - window..]);
    let current_zscore = zscore_series.last().copied().unwrap_or_default();

    ZScoreResult {
        current_zscore,
        mean,
        std,
        zscore_series,
    }
}

fn score(value: f64, mean: f64, std: f64) -> f64 {
    if std > 0.0 && std.is_finite() {
        (value - mean) / std
    } else {
        0.0
    }
}
