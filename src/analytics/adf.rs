//! Augmented Dickey-Fuller stationarity test
//!
//! Constant-only regression with the lag order chosen by AIC. P-values use
//! MacKinnon's (1994) normal approximation and critical values his (2010)
//! response surface.

use super::ols::{ols, OlsFit};
use super::types::{AdfResult, CriticalValues};
use statrs::distribution::{ContinuousCDF, Normal};

/// Finite observations required to run the test
pub const MIN_ADF_POINTS: usize = 10;

/// Significance level for `is_stationary`
const SIGNIFICANCE: f64 = 0.05;

// MacKinnon (1994), constant, one variable
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

// MacKinnon (2010), constant, one variable
const CRIT_1: [f64; 4] = [-3.43035, -6.5393, -16.786, -79.433];
const CRIT_5: [f64; 4] = [-2.86154, -2.8903, -4.234, -40.040];
const CRIT_10: [f64; 4] = [-2.56677, -1.5384, -2.809, 0.0];

/// Run the ADF test on `series`.
///
/// Non-finite values are dropped first. Too few points, a singular design
/// (e.g. a constant series) or a non-finite statistic give
/// [`AdfResult::insufficient`].
pub fn adf_test(series: &[f64]) -> AdfResult {
    let x: Vec<f64> = series.iter().copied().filter(|v| v.is_finite()).collect();
    let n = x.len();
    if n < MIN_ADF_POINTS {
        return AdfResult::insufficient();
    }

    let maxlag = max_lag(n);
    let diffs: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

    // Lag selection on the common sample starting at `maxlag`
    let mut best: Option<(usize, f64)> = None;
    for lag in 0..=maxlag {
        let Some(fit) = fit_lag(&x, &diffs, lag, maxlag) else {
            continue;
        };
        let aic = fit.aic();
        if aic.is_finite() && best.map_or(true, |(_, b)| aic < b) {
            best = Some((lag, aic));
        }
    }
    let Some((used_lag, _)) = best else {
        return AdfResult::insufficient();
    };

    let Some(fit) = fit_lag(&x, &diffs, used_lag, used_lag) else {
        return AdfResult::insufficient();
    };
    let test_statistic = fit.t_stat(1);
    if !test_statistic.is_finite() {
        return AdfResult::insufficient();
    }

    let p_value = mackinnon_p_value(test_statistic);
    AdfResult {
        test_statistic,
        p_value,
        critical_values: critical_values(fit.nobs),
        used_lag,
        nobs: fit.nobs,
        is_stationary: p_value <= SIGNIFICANCE,
    }
}

/// Schwert's rule `ceil(12 (n/100)^(1/4))`, capped so the regression keeps
/// enough observations
fn max_lag(n: usize) -> usize {
    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    schwert.min((n / 2).saturating_sub(2))
}

/// Regress `Δx[t]` on `[1, x[t], Δx[t-1], .., Δx[t-lag]]` for `t` in
/// `start..n-1`
fn fit_lag(x: &[f64], diffs: &[f64], lag: usize, start: usize) -> Option<OlsFit> {
    let rows: Vec<Vec<f64>> = (start..diffs.len())
        .map(|t| {
            let mut row = Vec::with_capacity(lag + 2);
            row.push(1.0);
            row.push(x[t]);
            row.extend((1..=lag).map(|i| diffs[t - i]));
            row
        })
        .collect();
    ols(&rows, &diffs[start..])
}

/// Approximate p-value of an ADF statistic
pub fn mackinnon_p_value(stat: f64) -> f64 {
    if stat > TAU_MAX {
        return 1.0;
    }
    if stat < TAU_MIN {
        return 0.0;
    }
    let z = if stat <= TAU_STAR {
        polyval(&TAU_SMALL_P, stat)
    } else {
        polyval(&TAU_LARGE_P, stat)
    };
    Normal::standard().cdf(z)
}

/// Finite-sample critical values for a regression with `nobs` observations
pub fn critical_values(nobs: usize) -> CriticalValues {
    let surface = |b: &[f64; 4]| {
        let n = nobs as f64;
        b[0] + b[1] / n + b[2] / n.powi(2) + b[3] / n.powi(3)
    };
    CriticalValues {
        one_pct: surface(&CRIT_1),
        five_pct: surface(&CRIT_5),
        ten_pct: surface(&CRIT_10),
    }
}

/// `c[0] + c[1] x + c[2] x² + ...`
fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}
