//! Run command implementation

use super::{alert_engine, symbols_or};
use crate::config::Config;
use crate::feed::{BinanceConnector, FeedConnector};
use crate::ingest::IngestionService;
use crate::push::{PushChannel, PushEvent};
use crate::store::{open_store, TickStore};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

/// Capacity of the push channel used by the collecting commands
const PUSH_CAPACITY: usize = 1024;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Symbols to collect (defaults to feed.symbols)
    pub symbols: Vec<String>,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(short, long)]
    pub duration_secs: Option<u64>,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let connector = BinanceConnector::new(&config.feed.ws_url)
            .max_reconnects(config.feed.max_reconnects)
            .ping_interval(Duration::from_secs(config.feed.ping_interval_secs));
        let symbols = symbols_or(&self.symbols, &config.feed.symbols);
        let store = open_store(&config.store)?;

        collect(Arc::new(connector), store, config, &symbols, self.duration_secs).await
    }
}

/// Collect `symbols` through `connector`, printing push events as JSON lines
/// until Ctrl-C or the optional duration elapses
pub(super) async fn collect(
    connector: Arc<dyn FeedConnector>,
    store: Arc<dyn TickStore>,
    config: &Config,
    symbols: &[String],
    duration_secs: Option<u64>,
) -> anyhow::Result<()> {
    let push = PushChannel::new(PUSH_CAPACITY);
    let service = IngestionService::new(
        connector,
        store,
        alert_engine(config),
        push.clone(),
        &config.ingestion,
    );

    let printer = tokio::spawn(print_events(push.subscribe()));

    let started = service.start(symbols).await;
    tracing::info!(requested = symbols.len(), started, "Collection running");

    match duration_secs {
        Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
        None => tokio::signal::ctrl_c().await?,
    }

    tracing::info!("Shutting down");
    service.stop().await;
    printer.abort();
    Ok(())
}

async fn print_events(mut rx: tokio::sync::broadcast::Receiver<PushEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "Failed to encode push event"),
            },
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Push printer lagging");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
