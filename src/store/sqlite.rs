//! SQLite-backed tick store

use super::{StoreError, TickStore};
use crate::feed::Tick;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::path::Path;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS ticks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL,
    timestamp_us INTEGER NOT NULL,
    price REAL NOT NULL,
    size REAL NOT NULL,
    created_at_ms INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_ticks_symbol_time ON ticks(symbol, timestamp_us);
CREATE INDEX IF NOT EXISTS idx_ticks_time ON ticks(timestamp_us);
"#;

/// Tick store on a single SQLite connection.
///
/// Timestamps are stored as microseconds since the epoch so ordering is
/// numeric. The connection mutex serializes writers.
pub struct SqliteTickStore {
    conn: Mutex<Connection>,
}

impl SqliteTickStore {
    /// Open (creating if needed) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn query_ticks(
        &self,
        sql: &str,
        symbol: &str,
        bind: impl rusqlite::Params,
    ) -> Result<Vec<Tick>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(sql)?;
        let rows = stmt.query_map(bind, |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, f64>(2)?,
            ))
        })?;

        let mut ticks = Vec::new();
        for row in rows {
            let (micros, price, size) = row?;
            let timestamp = DateTime::from_timestamp_micros(micros)
                .ok_or(StoreError::CorruptTimestamp(micros))?;
            ticks.push(Tick::new(symbol, timestamp, price, size));
        }
        Ok(ticks)
    }
}

impl TickStore for SqliteTickStore {
    fn save_tick(
        &self,
        symbol: &str,
        timestamp: DateTime<Utc>,
        price: f64,
        size: f64,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO ticks (symbol, timestamp_us, price, size, created_at_ms) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?
        .execute(params![
            symbol,
            timestamp.timestamp_micros(),
            price,
            size,
            Utc::now().timestamp_millis(),
        ])?;
        Ok(())
    }

    fn get_recent_ticks(&self, symbol: &str, limit: usize) -> Result<Vec<Tick>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut ticks = self.query_ticks(
            "SELECT timestamp_us, price, size FROM ticks WHERE symbol = ?1 \
             ORDER BY timestamp_us DESC, id DESC LIMIT ?2",
            symbol,
            params![symbol, limit],
        )?;
        ticks.reverse();
        Ok(ticks)
    }

    fn get_ticks_in_range(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Tick>, StoreError> {
        self.query_ticks(
            "SELECT timestamp_us, price, size FROM ticks \
             WHERE symbol = ?1 AND timestamp_us BETWEEN ?2 AND ?3 \
             ORDER BY timestamp_us ASC, id ASC",
            symbol,
            params![symbol, start.timestamp_micros(), end.timestamp_micros()],
        )
    }
}
