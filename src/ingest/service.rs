//! Collection service

use super::buffer::IngestionBuffer;
use super::pipeline::TickPipeline;
use super::scheduler::PeriodicTask;
use super::supervisor::{ConnectionState, StreamSupervisor};
use crate::alert::AlertEngine;
use crate::config::IngestionConfig;
use crate::feed::{FeedConnector, Tick};
use crate::observer::{SubscriptionId, TickSubscriber};
use crate::push::{PushChannel, PushEvent};
use crate::store::TickStore;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct CollectionState {
    collecting: bool,
    active_symbols: Vec<String>,
}

/// Owns collection state, the feed supervisor and the periodic drain worker.
///
/// While collecting, the buffer is drained every `drain_interval_ms` and
/// non-empty snapshots are published as [`PushEvent::TickBatch`].
pub struct IngestionService {
    supervisor: StreamSupervisor,
    push: PushChannel,
    state: Mutex<CollectionState>,
    drainer: Mutex<Option<PeriodicTask>>,
    stagger: Duration,
    drain_interval: Duration,
    stop_timeout: Duration,
}

impl IngestionService {
    /// Wire a service around the given sinks.
    ///
    /// Fired alerts are forwarded to `push`.
    pub fn new(
        connector: Arc<dyn FeedConnector>,
        store: Arc<dyn TickStore>,
        alerts: Arc<AlertEngine>,
        push: PushChannel,
        config: &IngestionConfig,
    ) -> Self {
        alerts.subscribe(Arc::new(push.clone()));
        let buffer = Arc::new(IngestionBuffer::new(config.buffer_capacity));
        let pipeline = Arc::new(TickPipeline::new(store, buffer, alerts));

        Self {
            supervisor: StreamSupervisor::new(connector, pipeline, config.stop_timeout()),
            push,
            state: Mutex::new(CollectionState::default()),
            drainer: Mutex::new(None),
            stagger: config.stagger(),
            drain_interval: config.drain_interval(),
            stop_timeout: config.stop_timeout(),
        }
    }

    /// Begin collecting `symbols`, starting feeds one stagger interval apart.
    ///
    /// Returns how many feeds were newly started. Connect failures are logged
    /// and skipped.
    pub async fn start(&self, symbols: &[String]) -> usize {
        {
            let mut state = self.state.lock();
            state.collecting = true;
            for symbol in symbols {
                let symbol = symbol.to_lowercase();
                if !state.active_symbols.contains(&symbol) {
                    state.active_symbols.push(symbol);
                }
            }
        }
        self.ensure_drainer();
        info!(count = symbols.len(), "Starting collection");

        let mut started = 0;
        for (i, symbol) in symbols.iter().enumerate() {
            if i > 0 && !self.stagger.is_zero() {
                tokio::time::sleep(self.stagger).await;
            }
            if !self.is_collecting() {
                debug!(remaining = symbols.len() - i, "Collection stopped during staggered start");
                break;
            }
            if self.start_feed(symbol).await {
                started += 1;
            }
            // stop() may have drained the supervisor before this feed was registered
            if !self.is_collecting() {
                self.supervisor.stop().await;
                break;
            }
        }
        started
    }

    /// Track a new symbol, starting its feed right away when collecting.
    ///
    /// Returns false if the symbol was already active.
    pub async fn add_symbol(&self, symbol: &str) -> bool {
        let symbol = symbol.to_lowercase();
        let collecting = {
            let mut state = self.state.lock();
            if state.active_symbols.contains(&symbol) {
                return false;
            }
            state.active_symbols.push(symbol.clone());
            state.collecting
        };

        if collecting {
            self.start_feed(&symbol).await;
            if !self.is_collecting() {
                self.supervisor.stop().await;
            }
        }
        true
    }

    /// Stop collection: close every feed and the drain worker.
    ///
    /// Always closes whatever the supervisor still tracks, even when the
    /// service already looks idle.
    pub async fn stop(&self) {
        {
            let mut state = self.state.lock();
            state.collecting = false;
            state.active_symbols.clear();
        }

        self.supervisor.stop().await;
        let drainer = self.drainer.lock().take();
        if let Some(task) = drainer {
            task.shutdown(self.stop_timeout).await;
        }
        info!("Collection stopped");
    }

    pub fn is_collecting(&self) -> bool {
        self.state.lock().collecting
    }

    pub fn active_symbols(&self) -> Vec<String> {
        self.state.lock().active_symbols.clone()
    }

    pub fn feed_state(&self, symbol: &str) -> ConnectionState {
        self.supervisor.state(symbol)
    }

    /// Snapshot of buffered ticks, emptying the buffer when `clear` is set
    pub fn drain(&self, clear: bool) -> Vec<Tick> {
        self.pipeline().buffer().drain(clear)
    }

    pub fn subscribe_ticks(&self, subscriber: Arc<dyn TickSubscriber>) -> SubscriptionId {
        self.pipeline().subscribe(subscriber)
    }

    pub fn unsubscribe_ticks(&self, id: SubscriptionId) -> bool {
        self.pipeline().unsubscribe(id)
    }

    pub fn push(&self) -> &PushChannel {
        &self.push
    }

    pub fn pipeline(&self) -> &Arc<TickPipeline> {
        self.supervisor.pipeline()
    }

    async fn start_feed(&self, symbol: &str) -> bool {
        match self.supervisor.start(symbol).await {
            Ok(started) => started,
            Err(e) => {
                warn!(symbol, error = %e, "Could not start feed");
                false
            }
        }
    }

    fn ensure_drainer(&self) {
        let mut drainer = self.drainer.lock();
        if drainer.is_some() {
            return;
        }

        let buffer = Arc::clone(self.pipeline().buffer());
        let push = self.push.clone();
        *drainer = Some(PeriodicTask::spawn(
            "buffer-drain",
            self.drain_interval,
            move || {
                let batch = buffer.drain(true);
                if batch.is_empty() {
                    return;
                }
                debug!(ticks = batch.len(), "Publishing tick batch");
                push.publish(PushEvent::TickBatch(batch));
            },
        ));
    }
}
