//! WebSocket types and configuration

use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};

/// Exponential reconnect delay: `initial * 2^(attempt-1)`, capped at `max`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub initial: Duration,
    pub max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            max: Duration::from_secs(60),
        }
    }
}

impl Backoff {
    /// Delay before reconnect attempt `attempt` (1-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.initial.saturating_mul(1 << exp).min(self.max)
    }
}

/// Stream endpoint plus keepalive and reconnect policy
#[derive(Debug, Clone)]
pub struct WsConfig {
    pub url: String,
    /// Reconnects allowed after a transport failure; 0 never reconnects
    pub max_reconnects: u32,
    pub backoff: Backoff,
    /// A ping unanswered by the next tick counts as a transport failure
    pub ping_interval: Duration,
}

impl WsConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_reconnects: 0,
            backoff: Backoff::default(),
            ping_interval: Duration::from_secs(30),
        }
    }

    pub fn max_reconnects(mut self, n: u32) -> Self {
        self.max_reconnects = n;
        self
    }

    pub fn backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.backoff = Backoff { initial, max };
        self
    }

    pub fn ping_interval(mut self, d: Duration) -> Self {
        self.ping_interval = d;
        self
    }
}

/// WebSocket message types
#[derive(Debug, Clone, PartialEq)]
pub enum WsMessage {
    /// Text frame payload
    Text(String),
    /// Connection established
    Connected,
    /// Connection closed, no further messages follow
    Disconnected,
    /// Reconnecting after failure
    Reconnecting { attempt: u32 },
}

/// WebSocket errors
#[derive(Debug, Clone, Error)]
pub enum WsError {
    /// Connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// Send failed
    #[error("Send failed: {0}")]
    SendFailed(String),
}

/// Receiving end of a live connection.
///
/// Dropping the connection or calling [`WsConnection::close`] asks the
/// producer to shut down; a final [`WsMessage::Disconnected`] may still arrive.
#[derive(Debug)]
pub struct WsConnection {
    messages: mpsc::Receiver<WsMessage>,
    close_tx: watch::Sender<bool>,
}

impl WsConnection {
    /// Create a connection together with the producer-side handles
    pub fn channel(buffer: usize) -> (Self, mpsc::Sender<WsMessage>, watch::Receiver<bool>) {
        let (tx, messages) = mpsc::channel(buffer);
        let (close_tx, close_rx) = watch::channel(false);
        (Self { messages, close_tx }, tx, close_rx)
    }

    /// Receive the next message; `None` once the producer is gone
    pub async fn recv(&mut self) -> Option<WsMessage> {
        self.messages.recv().await
    }

    /// Request the producer to close the connection
    pub fn close(&self) {
        let _ = self.close_tx.send(true);
    }
}

impl Drop for WsConnection {
    fn drop(&mut self) {
        self.close();
    }
}
