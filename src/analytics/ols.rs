//! Dense least squares for small designs

/// Fitted linear model
#[derive(Debug, Clone)]
pub(crate) struct OlsFit {
    pub coefficients: Vec<f64>,
    pub std_errors: Vec<f64>,
    /// Sum of squared residuals
    pub ssr: f64,
    pub nobs: usize,
}

impl OlsFit {
    /// Gaussian log-likelihood at the fitted parameters
    pub fn log_likelihood(&self) -> f64 {
        let n = self.nobs as f64;
        -n / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (self.ssr / n).ln() + 1.0)
    }

    /// Akaike information criterion
    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.coefficients.len() as f64
    }

    /// t statistic of coefficient `i`
    pub fn t_stat(&self, i: usize) -> f64 {
        self.coefficients[i] / self.std_errors[i]
    }
}

/// Relative pivot size below which the normal matrix counts as singular
const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Fit `y = X b` by solving the normal equations.
///
/// Returns `None` for an empty, rank-deficient or non-finite design, or when
/// there are no residual degrees of freedom.
pub(crate) fn ols(rows: &[Vec<f64>], y: &[f64]) -> Option<OlsFit> {
    let nobs = rows.len();
    let k = rows.first()?.len();
    if k == 0 || nobs != y.len() || nobs <= k {
        return None;
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, &yi) in rows.iter().zip(y) {
        for i in 0..k {
            xty[i] += row[i] * yi;
            for j in i..k {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..k {
        for j in 0..i {
            xtx[i][j] = xtx[j][i];
        }
    }

    let inverse = invert(&xtx)?;
    let coefficients: Vec<f64> = inverse
        .iter()
        .map(|r| r.iter().zip(&xty).map(|(a, b)| a * b).sum())
        .collect();

    let ssr: f64 = rows
        .iter()
        .zip(y)
        .map(|(row, yi)| {
            let fitted: f64 = row.iter().zip(&coefficients).map(|(a, b)| a * b).sum();
            (yi - fitted).powi(2)
        })
        .sum();

    let sigma2 = ssr / (nobs - k) as f64;
    let std_errors: Vec<f64> = (0..k).map(|i| (sigma2 * inverse[i][i]).sqrt()).collect();

    let finite = coefficients.iter().chain(&std_errors).all(|v| v.is_finite());
    if !finite || !ssr.is_finite() {
        return None;
    }

    Some(OlsFit {
        coefficients,
        std_errors,
        ssr,
        nobs,
    })
}

/// Gauss-Jordan inverse with partial pivoting
fn invert(matrix: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let k = matrix.len();
    let scale = matrix
        .iter()
        .enumerate()
        .map(|(i, r)| r[i].abs())
        .fold(0.0_f64, f64::max);
    if !(scale.is_finite() && scale > 0.0) {
        return None;
    }

    let mut a: Vec<Vec<f64>> = matrix.to_vec();
    let mut inv: Vec<Vec<f64>> = (0..k)
        .map(|i| (0..k).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..k {
        let pivot_row = (col..k).max_by(|&p, &q| a[p][col].abs().total_cmp(&a[q][col].abs()))?;
        if a[pivot_row][col].abs() <= SINGULAR_TOLERANCE * scale {
            return None;
        }
        a.swap(col, pivot_row);
        inv.swap(col, pivot_row);

        let pivot = a[col][col];
        for j in 0..k {
            a[col][j] /= pivot;
            inv[col][j] /= pivot;
        }

        for row in 0..k {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..k {
                a[row][j] -= factor * a[col][j];
                inv[row][j] -= factor * inv[col][j];
            }
        }
    }
    Some(inv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_coefficients() {
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![1.0, i as f64, (i * i) as f64]).collect();
        let y: Vec<f64> = rows
            .iter()
            .enumerate()
            .map(|(i, r)| 2.0 - 0.5 * r[1] + 0.25 * r[2] + if i % 2 == 0 { 0.01 } else { -0.01 })
            .collect();

        let fit = ols(&rows, &y).unwrap();
        assert!((fit.coefficients[0] - 2.0).abs() < 0.05);
        assert!((fit.coefficients[1] + 0.5).abs() < 0.05);
        assert!((fit.coefficients[2] - 0.25).abs() < 0.01);
        assert!(fit.std_errors.iter().all(|s| *s > 0.0));
        assert_eq!(fit.nobs, 10);
    }

    #[test]
    fn test_collinear_design_is_rejected() {
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![1.0, i as f64, 2.0 * i as f64]).collect();
        let y: Vec<f64> = (0..10).map(|i| i as f64).collect();
        assert!(ols(&rows, &y).is_none());
    }

    #[test]
    fn test_constant_column_alongside_intercept_is_rejected() {
        let rows: Vec<Vec<f64>> = (0..10).map(|_| vec![1.0, 5.0]).collect();
        let y = vec![0.0; 10];
        assert!(ols(&rows, &y).is_none());
    }

    #[test]
    fn test_no_degrees_of_freedom() {
        let rows = vec![vec![1.0, 0.0], vec![1.0, 1.0]];
        assert!(ols(&rows, &[0.0, 1.0]).is_none());
    }

    #[test]
    fn test_invert_identity() {
        let m = vec![vec![2.0, 0.0], vec![0.0, 4.0]];
        let inv = invert(&m).unwrap();
        assert_eq!(inv, vec![vec![0.5, 0.0], vec![0.0, 0.25]]);
    }
}
