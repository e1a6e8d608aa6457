//! Per-tick fan-out

use super::buffer::IngestionBuffer;
use crate::alert::AlertEngine;
use crate::feed::{parse_feed_message, Tick};
use crate::observer::{SubscriptionId, Subscribers, TickSubscriber};
use crate::store::TickStore;
use crate::telemetry::{increment, set_gauge, CounterMetric, GaugeMetric};
use std::sync::Arc;
use tracing::{error, trace, warn};

/// Shared sinks every normalized tick is delivered to.
///
/// Order per tick: store, buffer, alerts, subscribers. A store failure is
/// logged and does not stop the remaining steps.
pub struct TickPipeline {
    store: Arc<dyn TickStore>,
    buffer: Arc<IngestionBuffer>,
    alerts: Arc<AlertEngine>,
    subscribers: Subscribers<dyn TickSubscriber>,
}

impl TickPipeline {
    pub fn new(
        store: Arc<dyn TickStore>,
        buffer: Arc<IngestionBuffer>,
        alerts: Arc<AlertEngine>,
    ) -> Self {
        Self {
            store,
            buffer,
            alerts,
            subscribers: Subscribers::new(),
        }
    }

    pub fn store(&self) -> &Arc<dyn TickStore> {
        &self.store
    }

    pub fn buffer(&self) -> &Arc<IngestionBuffer> {
        &self.buffer
    }

    pub fn alerts(&self) -> &Arc<AlertEngine> {
        &self.alerts
    }

    /// Register a tick subscriber
    pub fn subscribe(&self, subscriber: Arc<dyn TickSubscriber>) -> SubscriptionId {
        self.subscribers.subscribe(subscriber)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Normalize a raw text frame and dispatch it.
    ///
    /// Returns the tick if one was produced. Malformed frames are logged and
    /// dropped.
    pub fn handle_frame(&self, frame: &str) -> Option<Tick> {
        match parse_feed_message(frame) {
            Ok(Some(tick)) => {
                self.dispatch(&tick);
                Some(tick)
            }
            Ok(None) => {
                trace!("Ignoring non-trade frame");
                None
            }
            Err(e) => {
                warn!(error = %e, "Dropping malformed tick");
                increment(CounterMetric::TicksMalformed);
                None
            }
        }
    }

    /// Deliver a normalized tick to every sink
    pub fn dispatch(&self, tick: &Tick) {
        if let Err(e) = self.store.save(tick) {
            error!(symbol = %tick.symbol, error = %e, "Failed to persist tick");
            increment(CounterMetric::StoreFailures);
        }

        self.buffer.append(tick.clone());
        set_gauge(GaugeMetric::BufferLen, self.buffer.len() as f64);

        self.alerts.check(tick);

        for subscriber in self.subscribers.snapshot() {
            subscriber.on_tick(tick);
        }
        increment(CounterMetric::TicksIngested);
    }
}
