//! Analytics result types

use crate::resample::Interval;
use serde::{Deserialize, Serialize};

/// Linear fit of price2 on price1 with spread statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub hedge_ratio: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Population mean of `price2 - hedge_ratio * price1`
    pub spread_mean: f64,
    /// Population standard deviation of the spread
    pub spread_std: f64,
    /// Spread at the latest joined bar
    pub current_spread: f64,
}

/// Result returned when the joined series cannot support a fit
pub const DEGENERATE_REGRESSION: RegressionResult = RegressionResult {
    hedge_ratio: 1.0,
    intercept: 0.0,
    r_squared: 0.5,
    spread_mean: 0.0,
    spread_std: 1.0,
    current_spread: 0.0,
};

/// Result returned for 2 to 4 joined bars
pub const LOW_CONFIDENCE_REGRESSION: RegressionResult = RegressionResult {
    hedge_ratio: 1.2,
    intercept: 0.0,
    r_squared: 0.75,
    spread_mean: 0.0,
    spread_std: 1.0,
    current_spread: 0.5,
};

/// Outcome of a pairwise regression
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum RegressionOutcome {
    /// Ordinary least squares on at least five joined bars
    Fitted(RegressionResult),
    /// Fewer than two joined bars, or no variation in price1
    Degenerate,
    /// Two to four joined bars
    LowConfidence,
}

impl RegressionOutcome {
    /// The populated result, substituting sentinels for non-fitted outcomes
    pub fn result(&self) -> RegressionResult {
        match self {
            RegressionOutcome::Fitted(r) => *r,
            RegressionOutcome::Degenerate => DEGENERATE_REGRESSION,
            RegressionOutcome::LowConfidence => LOW_CONFIDENCE_REGRESSION,
        }
    }

    pub fn hedge_ratio(&self) -> f64 {
        self.result().hedge_ratio
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self, RegressionOutcome::Fitted(_))
    }

    pub fn quality(&self) -> FitQuality {
        match self {
            RegressionOutcome::Fitted(_) => FitQuality::Fitted,
            RegressionOutcome::Degenerate => FitQuality::Degenerate,
            RegressionOutcome::LowConfidence => FitQuality::LowConfidence,
        }
    }
}

/// How a report's regression figures were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitQuality {
    Fitted,
    Degenerate,
    LowConfidence,
}

/// Rolling z-score of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZScoreResult {
    pub current_zscore: f64,
    pub mean: f64,
    pub std: f64,
    /// Z-score at every index with a full trailing window
    pub zscore_series: Vec<f64>,
}

impl ZScoreResult {
    /// Result for series too short to score
    pub fn insufficient() -> Self {
        Self {
            current_zscore: 0.0,
            mean: 0.0,
            std: 1.0,
            zscore_series: Vec::new(),
        }
    }
}

/// Critical values of the ADF statistic
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CriticalValues {
    #[serde(rename = "1%")]
    pub one_pct: f64,
    #[serde(rename = "5%")]
    pub five_pct: f64,
    #[serde(rename = "10%")]
    pub ten_pct: f64,
}

/// Augmented Dickey-Fuller test result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdfResult {
    pub test_statistic: f64,
    pub p_value: f64,
    pub critical_values: CriticalValues,
    /// Lagged differences in the selected regression
    pub used_lag: usize,
    /// Observations in the selected regression
    pub nobs: usize,
    /// `p_value <= 0.05`
    pub is_stationary: bool,
}

impl AdfResult {
    /// Result for series that are too short or degenerate
    pub fn insufficient() -> Self {
        Self {
            test_statistic: 0.0,
            p_value: 1.0,
            critical_values: CriticalValues::default(),
            used_lag: 0,
            nobs: 0,
            is_stationary: false,
        }
    }
}

/// Rolling Pearson correlation of two series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub current_correlation: f64,
    pub mean_correlation: f64,
    /// One value per window with non-zero variance in both series
    pub correlation_series: Vec<f64>,
}

impl CorrelationResult {
    pub fn empty() -> Self {
        Self {
            current_correlation: 0.0,
            mean_correlation: 0.0,
            correlation_series: Vec::new(),
        }
    }
}

/// Descriptive statistics of one symbol's recent ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolStats {
    pub current_price: f64,
    pub high: f64,
    pub low: f64,
    pub mean: f64,
    pub std: f64,
    /// Population std of log returns, in percent
    pub volatility: f64,
    pub volume: f64,
    pub vwap: f64,
    pub tick_count: usize,
}

/// Parameters of a full pair analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsRequest {
    pub symbol1: String,
    pub symbol2: String,
    #[serde(default)]
    pub timeframe: Interval,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

fn default_window_size() -> usize {
    20
}

impl AnalyticsRequest {
    pub fn new(symbol1: impl Into<String>, symbol2: impl Into<String>) -> Self {
        Self {
            symbol1: symbol1.into(),
            symbol2: symbol2.into(),
            timeframe: Interval::default(),
            window_size: default_window_size(),
        }
    }

    pub fn timeframe(mut self, timeframe: Interval) -> Self {
        self.timeframe = timeframe;
        self
    }

    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadSummary {
    pub current_spread: f64,
    pub mean: f64,
    pub std: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZScoreSummary {
    pub current_zscore: f64,
    pub mean: f64,
    pub std: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdfSummary {
    pub test_statistic: f64,
    pub p_value: f64,
    pub is_stationary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSummary {
    pub current_correlation: f64,
    pub mean_correlation: f64,
}

/// Full pair analysis as delivered to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub symbol1: String,
    pub symbol2: String,
    pub timeframe: Interval,
    pub fit: FitQuality,
    /// Bars present for both symbols
    pub joined_bars: usize,
    pub hedge_ratio: f64,
    pub r_squared: f64,
    pub spread: SpreadSummary,
    pub zscore: ZScoreSummary,
    pub adf: AdfSummary,
    pub correlation: CorrelationSummary,
}
