//! WebSocket client with keepalive and opt-in reconnection

use super::types::{WsConfig, WsConnection, WsError, WsMessage};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// Frames buffered between the socket task and the consumer
const FRAME_BUFFER: usize = 1024;

/// How a single socket session ended
enum SessionEnd {
    /// Close requested locally, by the server, or the consumer went away
    Closed,
    /// Transport failure, eligible for reconnect
    Failed(WsError),
}

/// Spawns one socket task per [`WsClient::connect`] call
pub struct WsClient {
    config: WsConfig,
}

impl WsClient {
    pub fn new(config: WsConfig) -> Self {
        Self { config }
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Open the socket in a background task and return its receiving end.
    ///
    /// The task emits `Connected` after each handshake and exactly one
    /// `Disconnected` when it finishes.
    pub fn connect(&self) -> WsConnection {
        let (conn, tx, close_rx) = WsConnection::channel(FRAME_BUFFER);
        tokio::spawn(drive(self.config.clone(), tx, close_rx));
        conn
    }
}

async fn drive(config: WsConfig, tx: mpsc::Sender<WsMessage>, mut close_rx: watch::Receiver<bool>) {
    let mut attempt = 0;
    loop {
        let error = match session(&config, &tx, &mut close_rx).await {
            SessionEnd::Closed => break,
            SessionEnd::Failed(e) => e,
        };

        if attempt >= config.max_reconnects || tx.is_closed() {
            warn!(url = %config.url, error = %error, attempts = attempt, "WebSocket closed after failure");
            break;
        }

        attempt += 1;
        let delay = config.backoff.delay(attempt);
        warn!(
            url = %config.url,
            error = %error,
            attempt,
            delay_ms = delay.as_millis() as u64,
            "WebSocket failed, reconnecting"
        );
        if tx.send(WsMessage::Reconnecting { attempt }).await.is_err() {
            return;
        }

        tokio::select! {
            _ = sleep(delay) => {}
            _ = close_requested(&mut close_rx) => break,
        }
    }

    let _ = tx.send(WsMessage::Disconnected).await;
}

/// Resolves once a close is requested or the consumer handle is gone
async fn close_requested(close_rx: &mut watch::Receiver<bool>) {
    while !*close_rx.borrow_and_update() {
        if close_rx.changed().await.is_err() {
            return;
        }
    }
}

async fn session(
    config: &WsConfig,
    tx: &mpsc::Sender<WsMessage>,
    close_rx: &mut watch::Receiver<bool>,
) -> SessionEnd {
    if *close_rx.borrow() {
        return SessionEnd::Closed;
    }
    info!(url = %config.url, "Connecting to WebSocket");

    let socket = tokio::select! {
        result = connect_async(config.url.as_str()) => match result {
            Ok((socket, _response)) => socket,
            Err(e) => return SessionEnd::Failed(WsError::ConnectionFailed(e.to_string())),
        },
        _ = close_requested(close_rx) => return SessionEnd::Closed,
    };
    let (mut sink, mut frames) = socket.split();

    if tx.send(WsMessage::Connected).await.is_err() {
        return SessionEnd::Closed;
    }

    let mut keepalive = interval_at(Instant::now() + config.ping_interval, config.ping_interval);
    keepalive.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut awaiting_pong = false;

    loop {
        tokio::select! {
            frame = frames.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if tx.send(WsMessage::Text(text)).await.is_err() {
                        debug!(url = %config.url, "Consumer dropped, closing socket");
                        return SessionEnd::Closed;
                    }
                }
                Some(Ok(Message::Ping(payload))) => {
                    if let Err(e) = sink.send(Message::Pong(payload)).await {
                        return SessionEnd::Failed(WsError::SendFailed(e.to_string()));
                    }
                }
                Some(Ok(Message::Pong(_))) => awaiting_pong = false,
                Some(Ok(Message::Close(_))) => {
                    info!(url = %config.url, "Server closed WebSocket");
                    return SessionEnd::Closed;
                }
                // binary and raw frames carry nothing for trade streams
                Some(Ok(_)) => {}
                Some(Err(e)) => return SessionEnd::Failed(WsError::ConnectionFailed(e.to_string())),
                None => {
                    return SessionEnd::Failed(WsError::ConnectionFailed("stream ended".into()));
                }
            },
            _ = close_requested(close_rx) => {
                let _ = sink.send(Message::Close(None)).await;
                return SessionEnd::Closed;
            }
            _ = keepalive.tick() => {
                if awaiting_pong {
                    return SessionEnd::Failed(WsError::ConnectionFailed("pong timeout".into()));
                }
                if let Err(e) = sink.send(Message::Ping(Vec::new())).await {
                    return SessionEnd::Failed(WsError::SendFailed(e.to_string()));
                }
                awaiting_pong = true;
            }
        }
    }
}
