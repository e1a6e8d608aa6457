//! Synthetic feed connector

use super::ticks::TickGenerator;
use crate::feed::{FeedConnector, Tick};
use crate::ingest::PeriodicTask;
use crate::ws::{WsConnection, WsError, WsMessage};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info};

const CHANNEL_BUFFER: usize = 256;

/// Feed connector emitting generated trades in exchange frame format.
///
/// Lets the full ingestion pipeline run without network access.
#[derive(Debug, Clone)]
pub struct SyntheticConnector {
    generator: Arc<Mutex<TickGenerator>>,
    interval: Duration,
}

impl SyntheticConnector {
    pub fn new(generator: TickGenerator, interval: Duration) -> Self {
        Self {
            generator: Arc::new(Mutex::new(generator)),
            interval,
        }
    }
}

/// Encode a tick as an exchange trade frame
pub fn trade_frame(tick: &Tick) -> String {
    json!({
        "e": "trade",
        "E": tick.timestamp.timestamp_millis(),
        "s": tick.symbol.to_uppercase(),
        "p": tick.price.to_string(),
        "q": tick.size.to_string(),
    })
    .to_string()
}

#[async_trait]
impl FeedConnector for SyntheticConnector {
    async fn connect(&self, symbol: &str) -> Result<WsConnection, WsError> {
        let (conn, tx, mut close_rx) = WsConnection::channel(CHANNEL_BUFFER);
        tx.send(WsMessage::Connected)
            .await
            .map_err(|e| WsError::SendFailed(e.to_string()))?;

        let symbol = symbol.to_lowercase();
        let generator = Arc::clone(&self.generator);
        let frames = tx.clone();
        let task_symbol = symbol.clone();
        let emitter = PeriodicTask::spawn(format!("synthetic-{symbol}"), self.interval, move || {
            let tick = generator.lock().next_tick(&task_symbol);
            match frames.try_send(WsMessage::Text(trade_frame(&tick))) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => debug!(symbol = %task_symbol, "Synthetic frame dropped"),
                Err(TrySendError::Closed(_)) => {}
            }
        });
        info!(%symbol, interval_ms = self.interval.as_millis() as u64, "Synthetic feed started");

        tokio::spawn(async move {
            tokio::select! {
                _ = async {
                    while !*close_rx.borrow_and_update() {
                        if close_rx.changed().await.is_err() {
                            break;
                        }
                    }
                } => {}
                _ = tx.closed() => {}
            }
            emitter.shutdown(Duration::from_secs(1)).await;
            let _ = tx.send(WsMessage::Disconnected).await;
            debug!(%symbol, "Synthetic feed closed");
        });

        Ok(conn)
    }
}
