//! Raw trade event to [`Tick`] normalization

use super::types::{FeedFrame, RawTradeEvent, Tick};
use chrono::{TimeZone, Utc};
use thiserror::Error;

/// A feed message that cannot be turned into a tick
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedTickError {
    /// Frame is not valid JSON for a trade event
    #[error("Invalid feed frame: {0}")]
    InvalidFrame(String),
    /// A required field is absent or empty
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    /// A numeric field failed to parse or is not finite
    #[error("Invalid number in field {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    /// Event time cannot be represented
    #[error("Event time out of range: {0}")]
    InvalidTimestamp(i64),
}

/// Normalize a raw trade event into a canonical tick.
///
/// The symbol is lower-cased, the event time becomes a UTC instant and the
/// price/quantity strings are parsed to `f64`. No partial tick is ever returned.
pub fn normalize(event: &RawTradeEvent) -> Result<Tick, MalformedTickError> {
    let symbol = event
        .symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(MalformedTickError::MissingField("s"))?
        .to_lowercase();

    let millis = event
        .event_time
        .ok_or(MalformedTickError::MissingField("E"))?;
    let timestamp = Utc
        .timestamp_millis_opt(millis)
        .single()
        .ok_or(MalformedTickError::InvalidTimestamp(millis))?;

    let price = parse_number("p", event.price.as_deref())?;
    let size = parse_number("q", event.quantity.as_deref())?;

    Ok(Tick {
        symbol,
        timestamp,
        price,
        size,
    })
}

/// Decode a text frame from the feed.
///
/// Returns `Ok(None)` for events that are not trades (subscription acks,
/// other stream types), which are ignored without error.
pub fn parse_feed_message(text: &str) -> Result<Option<Tick>, MalformedTickError> {
    let frame: FeedFrame = serde_json::from_str(text)
        .map_err(|e| MalformedTickError::InvalidFrame(e.to_string()))?;
    let event = frame.into_event();

    if !event.is_trade() {
        return Ok(None);
    }

    normalize(&event).map(Some)
}

fn parse_number(field: &'static str, raw: Option<&str>) -> Result<f64, MalformedTickError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(MalformedTickError::MissingField(field))?;

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(MalformedTickError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade_event() -> RawTradeEvent {
        RawTradeEvent {
            event_type: Some("trade".to_string()),
            event_time: Some(1_704_067_200_000),
            symbol: Some("BTCUSDT".to_string()),
            price: Some("42500.50".to_string()),
            quantity: Some("0.001".to_string()),
        }
    }

    #[test]
    fn test_normalize_valid_event() {
        let tick = normalize(&trade_event()).unwrap();
        assert_eq!(tick.symbol, "btcusdt");
        assert_eq!(tick.timestamp.timestamp_millis(), 1_704_067_200_000);
        assert_eq!(tick.price, 42500.50);
        assert_eq!(tick.size, 0.001);
    }

    #[test]
    fn test_normalize_missing_symbol() {
        let event = RawTradeEvent {
            symbol: None,
            ..trade_event()
        };
        assert_eq!(
            normalize(&event),
            Err(MalformedTickError::MissingField("s"))
        );
    }

    #[test]
    fn test_normalize_blank_symbol() {
        let event = RawTradeEvent {
            symbol: Some("  ".to_string()),
            ..trade_event()
        };
        assert_eq!(
            normalize(&event),
            Err(MalformedTickError::MissingField("s"))
        );
    }

    #[test]
    fn test_normalize_missing_event_time() {
        let event = RawTradeEvent {
            event_time: None,
            ..trade_event()
        };
        assert_eq!(
            normalize(&event),
            Err(MalformedTickError::MissingField("E"))
        );
    }

    #[test]
    fn test_normalize_non_numeric_price() {
        let event = RawTradeEvent {
            price: Some("not_a_number".to_string()),
            ..trade_event()
        };
        assert!(matches!(
            normalize(&event),
            Err(MalformedTickError::InvalidNumber { field: "p", .. })
        ));
    }

    #[test]
    fn test_normalize_rejects_non_finite_quantity() {
        let event = RawTradeEvent {
            quantity: Some("NaN".to_string()),
            ..trade_event()
        };
        assert!(matches!(
            normalize(&event),
            Err(MalformedTickError::InvalidNumber { field: "q", .. })
        ));
    }

    #[test]
    fn test_normalize_out_of_range_timestamp() {
        let event = RawTradeEvent {
            event_time: Some(i64::MAX),
            ..trade_event()
        };
        assert_eq!(
            normalize(&event),
            Err(MalformedTickError::InvalidTimestamp(i64::MAX))
        );
    }

    #[test]
    fn test_parse_trade_frame() {
        let msg = r#"{"e":"trade","E":1704067200000,"s":"ETHUSDT","t":1,"p":"2250.10","q":"1.5","T":1704067200001}"#;
        let tick = parse_feed_message(msg).unwrap().unwrap();
        assert_eq!(tick.symbol, "ethusdt");
        assert_eq!(tick.price, 2250.10);
        assert_eq!(tick.size, 1.5);
    }

    #[test]
    fn test_parse_combined_stream_frame() {
        let msg = r#"{"stream":"btcusdt@trade","data":{"e":"trade","E":1704067200000,"s":"BTCUSDT","p":"100.0","q":"2"}}"#;
        let tick = parse_feed_message(msg).unwrap().unwrap();
        assert_eq!(tick.symbol, "btcusdt");
        assert_eq!(tick.size, 2.0);
    }

    #[test]
    fn test_parse_ignores_non_trade_events() {
        let msg = r#"{"e":"aggTrade","E":1704067200000,"s":"BTCUSDT","p":"100.0","q":"2"}"#;
        assert_eq!(parse_feed_message(msg), Ok(None));

        let ack = r#"{"result":null,"id":1}"#;
        assert_eq!(parse_feed_message(ack), Ok(None));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_feed_message("not valid json"),
            Err(MalformedTickError::InvalidFrame(_))
        ));
    }

    #[test]
    fn test_parse_trade_missing_price() {
        let msg = r#"{"e":"trade","E":1704067200000,"s":"BTCUSDT","q":"2"}"#;
        assert_eq!(
            parse_feed_message(msg),
            Err(MalformedTickError::MissingField("p"))
        );
    }
}
