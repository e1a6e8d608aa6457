//! Trade feed module
//!
//! Turns exchange trade frames into canonical ticks and abstracts the
//! transport that delivers them.

mod binance;
mod normalizer;
mod types;

pub use binance::{BinanceConnector, BINANCE_WS_URL};
pub use normalizer::{normalize, parse_feed_message, MalformedTickError};
pub use types::{RawTradeEvent, Tick};

use crate::ws::{WsConnection, WsError};
use async_trait::async_trait;

/// Opens a logical feed connection for one symbol
#[async_trait]
pub trait FeedConnector: Send + Sync {
    /// Connect to the symbol's trade stream.
    ///
    /// The returned connection yields `Connected` once live, text frames in
    /// exchange format, and a final `Disconnected`.
    async fn connect(&self, symbol: &str) -> Result<WsConnection, WsError>;
}
