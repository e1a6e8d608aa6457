//! Time-bucketed OHLCV resampling

mod resampler;
mod types;

pub use resampler::{resample, resample_unchecked, MIN_RESAMPLE_TICKS};
pub use types::{Interval, IntervalParseError, OhlcvBar, MAX_INTERVAL_SECS};
