//! Bar alignment and shared series helpers

use crate::resample::OhlcvBar;
use chrono::{DateTime, Utc};
use statrs::statistics::Statistics;

/// Close prices of two symbols on the bucket starts they share
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinedSeries {
    pub timestamps: Vec<DateTime<Utc>>,
    /// Closes of the first symbol
    pub x: Vec<f64>,
    /// Closes of the second symbol
    pub y: Vec<f64>,
}

impl JoinedSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// `y - hedge_ratio * x` at every joined bar
    pub fn spread(&self, hedge_ratio: f64) -> Vec<f64> {
        self.x
            .iter()
            .zip(&self.y)
            .map(|(x, y)| y - hedge_ratio * x)
            .collect()
    }
}

/// Inner join of two bar series on `bucket_start`.
///
/// Both inputs must be ascending by bucket start, as produced by the
/// resampler.
pub fn join_closes(a: &[OhlcvBar], b: &[OhlcvBar]) -> JoinedSeries {
    let mut joined = JoinedSeries::default();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].bucket_start.cmp(&b[j].bucket_start) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                joined.timestamps.push(a[i].bucket_start);
                joined.x.push(a[i].close);
                joined.y.push(b[j].close);
                i += 1;
                j += 1;
            }
        }
    }
    joined
}

/// Population mean and standard deviation; `(0, 0)` for an empty slice
pub(crate) fn mean_std(xs: &[f64]) -> (f64, f64) {
    if xs.is_empty() {
        return (0.0, 0.0);
    }
    (xs.iter().mean(), xs.iter().population_std_dev())
}
