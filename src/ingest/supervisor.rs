//! Per-symbol feed lifecycle

use super::pipeline::TickPipeline;
use crate::feed::FeedConnector;
use crate::telemetry::{set_gauge, GaugeMetric};
use crate::ws::{WsConnection, WsError, WsMessage};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Lifecycle state of one symbol's feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not tracked
    Idle,
    /// Connection requested, not yet live
    Connecting,
    /// Receiving frames
    Connected,
    /// Transport ended; no automatic restart
    Closed,
}

struct FeedEntry {
    /// Distinguishes this registration from earlier ones of the same symbol
    generation: u64,
    state: ConnectionState,
    stop_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

type FeedMap = Arc<Mutex<HashMap<String, FeedEntry>>>;

/// Runs one worker task per tracked symbol.
///
/// Each worker reads frames from its connection and hands them to the shared
/// [`TickPipeline`]. A symbol stays tracked (possibly `Closed`) until
/// [`StreamSupervisor::stop`].
pub struct StreamSupervisor {
    connector: Arc<dyn FeedConnector>,
    pipeline: Arc<TickPipeline>,
    feeds: FeedMap,
    next_generation: AtomicU64,
    stop_timeout: Duration,
}

impl StreamSupervisor {
    pub fn new(
        connector: Arc<dyn FeedConnector>,
        pipeline: Arc<TickPipeline>,
        stop_timeout: Duration,
    ) -> Self {
        Self {
            connector,
            pipeline,
            feeds: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
            stop_timeout,
        }
    }

    pub fn pipeline(&self) -> &Arc<TickPipeline> {
        &self.pipeline
    }

    /// Start a feed worker for `symbol`.
    ///
    /// Returns `Ok(false)` without side effects if the symbol is already
    /// tracked, and `Ok(false)` with the worker aborted if [`stop`] ran while
    /// connecting. A connect failure leaves the symbol tracked as `Closed`.
    ///
    /// [`stop`]: StreamSupervisor::stop
    pub async fn start(&self, symbol: &str) -> Result<bool, WsError> {
        let symbol = symbol.to_lowercase();
        let (stop_tx, stop_rx) = watch::channel(false);
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        {
            let mut feeds = self.feeds.lock();
            if feeds.contains_key(&symbol) {
                debug!(%symbol, "Feed already tracked");
                return Ok(false);
            }
            feeds.insert(
                symbol.clone(),
                FeedEntry {
                    generation,
                    state: ConnectionState::Connecting,
                    stop_tx,
                    task: None,
                },
            );
        }
        self.publish_feed_count();

        let conn = match self.connector.connect(&symbol).await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(%symbol, error = %e, "Feed connect failed");
                set_state(&self.feeds, &symbol, generation, ConnectionState::Closed);
                return Err(e);
            }
        };

        let task = tokio::spawn(run_feed(
            symbol.clone(),
            generation,
            conn,
            stop_rx,
            Arc::clone(&self.pipeline),
            Arc::clone(&self.feeds),
        ));

        match self.feeds.lock().get_mut(&symbol) {
            Some(entry) if entry.generation == generation => entry.task = Some(task),
            // stop() ran while connecting, possibly followed by a new start()
            _ => {
                debug!(%symbol, "Feed stopped while connecting");
                task.abort();
                return Ok(false);
            }
        }
        info!(%symbol, "Feed worker started");
        Ok(true)
    }

    /// Current state; `Idle` for untracked symbols
    pub fn state(&self, symbol: &str) -> ConnectionState {
        self.feeds
            .lock()
            .get(&symbol.to_lowercase())
            .map_or(ConnectionState::Idle, |e| e.state)
    }

    /// Tracked symbols, sorted
    pub fn tracked_symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.feeds.lock().keys().cloned().collect();
        symbols.sort();
        symbols
    }

    /// Close every feed and forget all symbols.
    ///
    /// Workers get `stop_timeout` to exit before they are aborted. Calling
    /// this with nothing tracked is a no-op.
    pub async fn stop(&self) {
        let entries: Vec<(String, FeedEntry)> = self.feeds.lock().drain().collect();
        if entries.is_empty() {
            return;
        }

        let mut tasks = Vec::with_capacity(entries.len());
        for (symbol, entry) in entries {
            let _ = entry.stop_tx.send(true);
            if let Some(task) = entry.task {
                tasks.push((symbol, task));
            }
        }

        for (symbol, mut task) in tasks {
            if tokio::time::timeout(self.stop_timeout, &mut task)
                .await
                .is_err()
            {
                warn!(%symbol, "Feed worker did not stop in time, aborting");
                task.abort();
            }
        }
        self.publish_feed_count();
        info!("All feeds stopped");
    }

    fn publish_feed_count(&self) {
        set_gauge(GaugeMetric::ActiveFeeds, self.feeds.lock().len() as f64);
    }
}

fn set_state(feeds: &FeedMap, symbol: &str, generation: u64, state: ConnectionState) {
    if let Some(entry) = feeds.lock().get_mut(symbol) {
        if entry.generation == generation {
            entry.state = state;
        }
    }
}

async fn run_feed(
    symbol: String,
    generation: u64,
    mut conn: WsConnection,
    mut stop_rx: watch::Receiver<bool>,
    pipeline: Arc<TickPipeline>,
    feeds: FeedMap,
) {
    loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    debug!(%symbol, "Feed stop requested");
                    break;
                }
            }
            msg = conn.recv() => match msg {
                Some(WsMessage::Connected) => {
                    info!(%symbol, "Feed connected");
                    set_state(&feeds, &symbol, generation, ConnectionState::Connected);
                }
                Some(WsMessage::Text(text)) => {
                    pipeline.handle_frame(&text);
                }
                Some(WsMessage::Reconnecting { attempt }) => {
                    warn!(%symbol, attempt, "Feed reconnecting");
                    set_state(&feeds, &symbol, generation, ConnectionState::Connecting);
                }
                Some(WsMessage::Disconnected) | None => {
                    warn!(%symbol, "Feed closed");
                    break;
                }
            }
        }
    }

    conn.close();
    set_state(&feeds, &symbol, generation, ConnectionState::Closed);
}
