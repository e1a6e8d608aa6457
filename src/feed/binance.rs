//! Binance trade stream connector

use super::FeedConnector;
use crate::ws::{WsClient, WsConfig, WsConnection, WsError};
use async_trait::async_trait;
use std::time::Duration;

/// Binance futures WebSocket base URL
pub const BINANCE_WS_URL: &str = "wss://fstream.binance.com/ws";

/// Opens one `<symbol>@trade` stream per symbol
#[derive(Debug, Clone)]
pub struct BinanceConnector {
    base_url: String,
    max_reconnects: u32,
    ping_interval: Duration,
}

impl Default for BinanceConnector {
    fn default() -> Self {
        Self::new(BINANCE_WS_URL)
    }
}

impl BinanceConnector {
    /// Create a connector against the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_reconnects: 0,
            ping_interval: Duration::from_secs(30),
        }
    }

    /// Allow reconnection with backoff after transport failures
    pub fn max_reconnects(mut self, n: u32) -> Self {
        self.max_reconnects = n;
        self
    }

    /// Set the keepalive ping interval
    pub fn ping_interval(mut self, d: Duration) -> Self {
        self.ping_interval = d;
        self
    }

    /// Build the WebSocket URL for a symbol's trade stream
    pub fn stream_url(&self, symbol: &str) -> String {
        format!("{}/{}@trade", self.base_url, symbol.to_lowercase())
    }
}

#[async_trait]
impl FeedConnector for BinanceConnector {
    async fn connect(&self, symbol: &str) -> Result<WsConnection, WsError> {
        let url = self.stream_url(symbol);
        tracing::info!(symbol, url = %url, "Opening Binance trade stream");

        let config = WsConfig::new(url)
            .max_reconnects(self.max_reconnects)
            .ping_interval(self.ping_interval);

        Ok(WsClient::new(config).connect())
    }
}
