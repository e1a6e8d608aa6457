//! Rolling Pearson correlation

use super::types::CorrelationResult;

/// Trailing-window Pearson correlation of `x` and `y`.
///
/// Windows where either series has zero variance are skipped. The current
/// value is the last window's correlation, or zero when that window is
/// degenerate.
pub fn correlate(x: &[f64], y: &[f64], window: usize) -> CorrelationResult {
    let n = x.len().min(y.len());
    if window < 2 || n < window {
        return CorrelationResult::empty();
    }

    let per_window: Vec<Option<f64>> = (window..=n)
        .map(|end| pearson(&x[end - window..end], &y[end - window..end]))
        .collect();

    let current_correlation = per_window.last().copied().flatten().unwrap_or(0.0);
    let correlation_series: Vec<f64> = per_window.into_iter().flatten().collect();
    let mean_correlation = if correlation_series.is_empty() {
        0.0
    } else {
        correlation_series.iter().sum::<f64>() / correlation_series.len() as f64
    };

    CorrelationResult {
        current_correlation,
        mean_correlation,
        correlation_series,
    }
}

fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let (dx, dy) = (xi - x_mean, yi - y_mean);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    let r = sxy / (sxx * syy).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_correlation() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        let result = correlate(&x, &y, 5);
        assert_eq!(result.correlation_series.len(), 6);
        assert!((result.current_correlation - 1.0).abs() < 1e-12);
        assert!((result.mean_correlation - 1.0).abs() < 1e-12);

        let inverse: Vec<f64> = x.iter().map(|v| -v).collect();
        assert!((correlate(&x, &inverse, 5).current_correlation + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_insufficient_points() {
        let result = correlate(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], 5);
        assert_eq!(result, CorrelationResult::empty());
        assert_eq!(correlate(&[1.0, 2.0], &[1.0, 2.0], 1), CorrelationResult::empty());
    }

    #[test]
    fn test_degenerate_windows_are_skipped() {
        // The last window of x is flat
        let x = [1.0, 2.0, 3.0, 5.0, 5.0, 5.0];
        let y = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let result = correlate(&x, &y, 3);

        assert_eq!(result.correlation_series.len(), 3);
        assert_eq!(result.current_correlation, 0.0);
        assert!(result.mean_correlation > 0.0);
    }

    #[test]
    fn test_all_windows_degenerate() {
        let result = correlate(&[1.0; 6], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3);
        assert!(result.correlation_series.is_empty());
        assert_eq!(result.mean_correlation, 0.0);
    }
}
