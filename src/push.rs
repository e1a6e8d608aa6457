//! Push channel to live clients
//!
//! Fan-out of tick batches and fired alerts over a tokio broadcast channel.
//! Slow receivers lag and lose events rather than blocking producers.

use crate::alert::{Alert, AlertSubscriber};
use crate::feed::Tick;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;
use uuid::Uuid;

/// Payload of an `alert_triggered` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertFired {
    pub alert_id: Uuid,
    pub name: String,
    pub symbol: String,
    pub triggered_price: f64,
    pub triggered_at: DateTime<Utc>,
}

impl AlertFired {
    /// Build the payload from a fired alert
    pub fn from_alert(alert: &Alert) -> Self {
        Self {
            alert_id: alert.id,
            name: alert.name.clone(),
            symbol: alert.symbol.clone(),
            triggered_price: alert.triggered_price.unwrap_or_default(),
            triggered_at: alert.triggered_at.unwrap_or(alert.created_at),
        }
    }
}

/// Event delivered to push clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum PushEvent {
    /// Snapshot drained from the ingestion buffer
    #[serde(rename = "tick_data")]
    TickBatch(Vec<Tick>),
    #[serde(rename = "alert_triggered")]
    AlertFired(AlertFired),
}

/// Broadcast sender shared by producers
#[derive(Debug, Clone)]
pub struct PushChannel {
    tx: broadcast::Sender<PushEvent>,
}

impl PushChannel {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Attach a new receiver
    pub fn subscribe(&self) -> broadcast::Receiver<PushEvent> {
        self.tx.subscribe()
    }

    /// Publish an event; returns the number of receivers reached
    pub fn publish(&self, event: PushEvent) -> usize {
        match self.tx.send(event) {
            Ok(n) => n,
            Err(_) => {
                trace!("No push receivers");
                0
            }
        }
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl AlertSubscriber for PushChannel {
    fn on_alert(&self, alert: &Alert) {
        self.publish(PushEvent::AlertFired(AlertFired::from_alert(alert)));
    }
}
