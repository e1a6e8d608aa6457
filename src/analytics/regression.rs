//! Hedge ratio regression

use super::series::mean_std;
use super::types::{RegressionOutcome, RegressionResult};

/// Joined bars required for a fitted regression
pub const MIN_FIT_POINTS: usize = 5;

/// Regress `y` on `x` by ordinary least squares.
///
/// Checks run in order: fewer than two points or no variation in `x` is
/// [`RegressionOutcome::Degenerate`]; fewer than [`MIN_FIT_POINTS`] is
/// [`RegressionOutcome::LowConfidence`]. Extra elements of the longer input
/// are ignored.
pub fn regress(x: &[f64], y: &[f64]) -> RegressionOutcome {
    let n = x.len().min(y.len());
    let (x, y) = (&x[..n], &y[..n]);

    if n < 2 {
        return RegressionOutcome::Degenerate;
    }

    let nf = n as f64;
    let x_mean = x.iter().sum::<f64>() / nf;
    let y_mean = y.iter().sum::<f64>() / nf;
    let sxx: f64 = x.iter().map(|v| (v - x_mean).powi(2)).sum();

    // Equivalent to n·Σx² − (Σx)² == 0, without the cancellation
    if !(sxx.is_finite() && sxx > 0.0) {
        return RegressionOutcome::Degenerate;
    }

    if n < MIN_FIT_POINTS {
        return RegressionOutcome::LowConfidence;
    }

    let sxy: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - x_mean) * (yi - y_mean))
        .sum();
    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let ss_tot: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
    let ss_res: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (yi - (intercept + slope * xi)).powi(2))
        .sum();
    let r_squared = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else {
        0.0
    };

    let spread: Vec<f64> = x.iter().zip(y).map(|(xi, yi)| yi - slope * xi).collect();
    let (spread_mean, spread_std) = mean_std(&spread);
    let current_spread = spread.last().copied().unwrap_or_default();

    RegressionOutcome::Fitted(RegressionResult {
        hedge_ratio: slope,
        intercept,
        r_squared,
        spread_mean,
        spread_std,
        current_spread,
    })
}
