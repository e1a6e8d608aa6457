//! Integration tests for synthetic collection through the ingestion service

use pairwatch::alert::{AlertCondition, AlertEngine};
use pairwatch::config::IngestionConfig;
use pairwatch::generator::{SyntheticConnector, TickGenerator};
use pairwatch::ingest::{ConnectionState, IngestionService};
use pairwatch::push::{PushChannel, PushEvent};
use pairwatch::store::{MemoryTickStore, TickStore};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

fn service(store: Arc<MemoryTickStore>, alerts: Arc<AlertEngine>, push: PushChannel) -> IngestionService {
    let mut base_prices = BTreeMap::new();
    base_prices.insert("btcusdt".to_string(), 60_000.0);
    base_prices.insert("ethusdt".to_string(), 3_500.0);
    let connector = SyntheticConnector::new(
        TickGenerator::with_seed(base_prices, 11),
        Duration::from_millis(10),
    );
    let config = IngestionConfig {
        drain_interval_ms: 20,
        stagger_ms: 0,
        stop_timeout_ms: 500,
        ..IngestionConfig::default()
    };
    IngestionService::new(Arc::new(connector), store, alerts, push, &config)
}

#[tokio::test]
async fn test_synthetic_collection_end_to_end() {
    let store = Arc::new(MemoryTickStore::new());
    let alerts = Arc::new(AlertEngine::new());
    let alert = alerts.create_alert("btc above zero", AlertCondition::Above, "BTCUSDT", 0.0);
    let push = PushChannel::new(256);
    let mut rx = push.subscribe();

    let service = service(Arc::clone(&store), Arc::clone(&alerts), push);
    let symbols = vec!["btcusdt".to_string(), "ethusdt".to_string()];
    assert_eq!(service.start(&symbols).await, 2);
    assert!(service.is_collecting());

    let mut batch_symbols = std::collections::HashSet::new();
    let mut fired = None;
    tokio::time::timeout(Duration::from_secs(5), async {
        while batch_symbols.len() < 2 || fired.is_none() {
            match rx.recv().await {
                Ok(PushEvent::TickBatch(ticks)) => {
                    batch_symbols.extend(ticks.into_iter().map(|t| t.symbol));
                }
                Ok(PushEvent::AlertFired(event)) => fired = Some(event),
                Err(_) => {}
            }
        }
    })
    .await
    .unwrap();

    let fired = fired.unwrap();
    assert_eq!(fired.alert_id, alert.id);
    assert_eq!(fired.symbol, "btcusdt");
    assert!(fired.triggered_price > 0.0);

    service.stop().await;
    assert!(!service.is_collecting());
    assert!(service.active_symbols().is_empty());
    assert_eq!(service.feed_state("btcusdt"), ConnectionState::Idle);

    // Stored ticks survive the stop and stay in timestamp order
    let stored = store.get_recent_ticks("ethusdt", 1000).unwrap();
    assert!(!stored.is_empty());
    assert!(stored.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    // Alerts fire once until reset
    let state = alerts.get(alert.id).unwrap();
    assert!(state.triggered);
    assert!(!state.is_armed());
}

#[tokio::test]
async fn test_restart_after_stop() {
    let store = Arc::new(MemoryTickStore::new());
    let service = service(
        Arc::clone(&store),
        Arc::new(AlertEngine::new()),
        PushChannel::new(16),
    );
    let symbols = vec!["ethusdt".to_string()];

    assert_eq!(service.start(&symbols).await, 1);
    service.stop().await;
    let first = store.len("ethusdt");

    assert_eq!(service.start(&symbols).await, 1);
    tokio::time::sleep(Duration::from_millis(100)).await;
    service.stop().await;
    assert!(store.len("ethusdt") > first);
}
