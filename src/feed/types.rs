//! Feed message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized trade tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Lower-cased trading symbol (e.g., "btcusdt")
    pub symbol: String,
    /// Exchange event time
    pub timestamp: DateTime<Utc>,
    /// Trade price
    pub price: f64,
    /// Trade quantity
    pub size: f64,
}

impl Tick {
    /// Create a new tick
    pub fn new(symbol: impl Into<String>, timestamp: DateTime<Utc>, price: f64, size: f64) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            price,
            size,
        }
    }
}

/// Trade event as sent by the exchange, before validation.
///
/// Every field is optional so that a frame with missing fields surfaces as a
/// [`MalformedTickError`](super::MalformedTickError) naming the field rather
/// than a generic decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTradeEvent {
    /// Event type
    #[serde(rename = "e")]
    pub event_type: Option<String>,
    /// Event time (milliseconds)
    #[serde(rename = "E")]
    pub event_time: Option<i64>,
    /// Symbol
    #[serde(rename = "s")]
    pub symbol: Option<String>,
    /// Price
    #[serde(rename = "p")]
    pub price: Option<String>,
    /// Quantity
    #[serde(rename = "q")]
    pub quantity: Option<String>,
}

impl RawTradeEvent {
    /// Whether this event is a trade
    pub fn is_trade(&self) -> bool {
        self.event_type.as_deref() == Some("trade")
    }
}

/// A text frame from either a raw stream or a combined stream
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum FeedFrame {
    /// `{"stream": "btcusdt@trade", "data": {...}}`
    Combined { data: RawTradeEvent },
    /// `{"e": "trade", ...}`
    Direct(RawTradeEvent),
}

impl FeedFrame {
    pub(crate) fn into_event(self) -> RawTradeEvent {
        match self {
            FeedFrame::Combined { data } => data,
            FeedFrame::Direct(event) => event,
        }
    }
}
