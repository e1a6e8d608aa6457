//! Integration tests for persistence and export

use chrono::{Duration, Utc};
use pairwatch::data::{export_ticks, read_parquet_ticks, ExportFormat};
use pairwatch::generator::TickGenerator;
use pairwatch::store::{SqliteTickStore, TickStore};
use std::collections::BTreeMap;
use tempfile::TempDir;

fn seeded_store(dir: &TempDir) -> SqliteTickStore {
    let store = SqliteTickStore::open(dir.path().join("ticks.db")).unwrap();
    let mut generator = TickGenerator::with_seed(BTreeMap::new(), 3);
    let symbols = vec!["btcusdt".to_string(), "adausdt".to_string()];
    let written = generator.seed_history(&store, &symbols, 50).unwrap();
    assert_eq!(written, 100);
    store
}

#[test]
fn test_sqlite_history_queries() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);

    let recent = store.get_recent_ticks("btcusdt", 10).unwrap();
    assert_eq!(recent.len(), 10);
    assert!(recent.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert!(recent.iter().all(|t| t.symbol == "btcusdt"));

    let all = store.get_recent_ticks("adausdt", 1000).unwrap();
    assert_eq!(all.len(), 50);

    let start = all[10].timestamp;
    let end = all[19].timestamp;
    let range = store.get_ticks_in_range("adausdt", start, end).unwrap();
    assert_eq!(range.len(), 10);
    assert_eq!(range.first().unwrap().timestamp, start);
    assert_eq!(range.last().unwrap().timestamp, end);

    let future = Utc::now() + Duration::days(1);
    assert!(store
        .get_ticks_in_range("adausdt", future, future + Duration::hours(1))
        .unwrap()
        .is_empty());
}

#[test]
fn test_history_survives_reopen() {
    let dir = TempDir::new().unwrap();
    drop(seeded_store(&dir));

    let store = SqliteTickStore::open(dir.path().join("ticks.db")).unwrap();
    assert_eq!(store.get_recent_ticks("btcusdt", 1000).unwrap().len(), 50);
}

#[test]
fn test_export_stored_ticks() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    let ticks = store.get_recent_ticks("btcusdt", 1000).unwrap();

    let csv_path = dir.path().join("out/btc.csv");
    export_ticks(&ticks, ExportFormat::Csv, &csv_path).unwrap();
    let text = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(text.lines().count(), ticks.len() + 1);

    let parquet_path = dir.path().join("out/btc.parquet");
    export_ticks(&ticks, ExportFormat::Parquet, &parquet_path).unwrap();
    assert_eq!(read_parquet_ticks(&parquet_path).unwrap(), ticks);
}
