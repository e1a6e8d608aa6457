//! Bar and interval types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Interval string that cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid interval {0:?}: expected forms like 1s, 15s, 1m, 5min, 1h, at most 168h")]
pub struct IntervalParseError(pub String);

/// Widest accepted bucket: one week
pub const MAX_INTERVAL_SECS: u64 = 7 * 24 * 3600;

/// Fixed bucket width, at whole-second granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Interval {
    seconds: u64,
}

impl Interval {
    /// Interval of `n` seconds, clamped to `1..=MAX_INTERVAL_SECS`
    pub const fn seconds(n: u64) -> Self {
        let seconds = if n == 0 {
            1
        } else if n > MAX_INTERVAL_SECS {
            MAX_INTERVAL_SECS
        } else {
            n
        };
        Self { seconds }
    }

    /// Interval of `n` minutes, clamped like [`Interval::seconds`]
    pub const fn minutes(n: u64) -> Self {
        Self::seconds(n.saturating_mul(60))
    }

    /// Width in seconds
    pub fn as_secs(&self) -> u64 {
        self.seconds
    }

    /// Start of the bucket containing `ts`: floor(ts, interval) on the UTC epoch
    pub fn bucket_start(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let width = self.seconds as i64 * 1_000_000;
        let micros = ts.timestamp_micros();
        let start = micros - micros.rem_euclid(width);
        DateTime::from_timestamp_micros(start).unwrap_or(ts)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::minutes(1)
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_ascii_lowercase();
        let split = raw
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(raw.len());
        let (digits, unit) = raw.split_at(split);

        let n: u64 = digits
            .parse()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| IntervalParseError(s.to_string()))?;

        let multiplier = match unit {
            "s" | "sec" | "secs" => 1,
            "m" | "min" | "mins" | "t" => 60,
            "h" | "hr" | "hour" => 3600,
            _ => return Err(IntervalParseError(s.to_string())),
        };

        n.checked_mul(multiplier)
            .filter(|secs| *secs <= MAX_INTERVAL_SECS)
            .map(Self::seconds)
            .ok_or_else(|| IntervalParseError(s.to_string()))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.seconds % 3600 == 0 {
            write!(f, "{}h", self.seconds / 3600)
        } else if self.seconds % 60 == 0 {
            write!(f, "{}m", self.seconds / 60)
        } else {
            write!(f, "{}s", self.seconds)
        }
    }
}

impl TryFrom<String> for Interval {
    type Error = IntervalParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Interval> for String {
    fn from(value: Interval) -> Self {
        value.to_string()
    }
}

/// Open-high-low-close-volume aggregate over one time bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub symbol: String,
    pub interval: Interval,
    pub bucket_start: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}
