//! Pair analytics
//!
//! Hedge ratio regression, spread z-score, ADF stationarity and rolling
//! correlation over resampled close prices. The pure functions take plain
//! slices; [`PairAnalytics`] feeds them from a [`TickStore`](crate::store::TickStore).

mod adf;
mod correlation;
mod ols;
mod pair;
mod regression;
mod series;
mod stats;
mod types;
mod zscore;

pub use adf::{adf_test, critical_values, mackinnon_p_value, MIN_ADF_POINTS};
pub use correlation::correlate;
pub use pair::PairAnalytics;
pub use regression::{regress, MIN_FIT_POINTS};
pub use series::{join_closes, JoinedSeries};
pub use stats::symbol_stats_from_ticks;
pub use types::{
    AdfResult, AdfSummary, AnalyticsReport, AnalyticsRequest, CorrelationResult,
    CorrelationSummary, CriticalValues, FitQuality, RegressionOutcome, RegressionResult,
    SpreadSummary, SymbolStats, ZScoreResult, ZScoreSummary, DEGENERATE_REGRESSION,
    LOW_CONFIDENCE_REGRESSION,
};
pub use zscore::{calculate_spread_zscore, MIN_ZSCORE_POINTS};
