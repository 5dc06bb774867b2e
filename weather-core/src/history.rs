//! Append-only log of past lookups.
//!
//! `SqliteHistoryStore` opens a fresh connection for every call; the
//! connection is dropped when the call returns, on success or failure.

use rusqlite::{Connection, OpenFlags, params};
use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, error};

use crate::{error::StoreError, model::HistoryEntry};

/// Number of rows shown in the "recent searches" panel.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

pub trait HistoryStore: Send + Sync + Debug {
    /// Make sure the backing log exists. Safe to call repeatedly.
    fn init(&self) -> Result<(), StoreError>;

    fn append(&self, entry: &HistoryEntry) -> Result<(), StoreError>;

    /// At most `limit` entries, newest first. Read failures yield an empty list.
    fn recent(&self, limit: usize) -> Vec<HistoryEntry>;
}

#[derive(Debug, Clone)]
pub struct SqliteHistoryStore {
    path: PathBuf,
}

impl SqliteHistoryStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    fn open(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&self.path)?)
    }

    fn open_read_only(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)?)
    }

    fn query_recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, StoreError> {
        let conn = self.open_read_only()?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = conn.prepare(
            "SELECT city, timestamp, temperature, description
             FROM search_history
             ORDER BY timestamp DESC, rowid DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit], |row| {
            Ok(HistoryEntry {
                label: row.get(0)?,
                timestamp_utc: row.get(1)?,
                temperature_c: row.get(2)?,
                description: row.get(3)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

impl HistoryStore for SqliteHistoryStore {
    fn init(&self) -> Result<(), StoreError> {
        debug!(path = %self.path.display(), "initializing history store");

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let conn = self.open()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS search_history (
                city TEXT,
                timestamp TEXT,
                temperature REAL,
                description TEXT
            );",
        )?;
        Ok(())
    }

    fn append(&self, entry: &HistoryEntry) -> Result<(), StoreError> {
        debug!(label = %entry.label, "saving search to history");

        let conn = self.open()?;
        conn.execute(
            "INSERT INTO search_history (city, timestamp, temperature, description)
             VALUES (?1, ?2, ?3, ?4)",
            params![entry.label, entry.timestamp_utc, entry.temperature_c, entry.description],
        )?;
        Ok(())
    }

    fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        match self.query_recent(limit) {
            Ok(entries) => {
                debug!(count = entries.len(), "history retrieved");
                entries
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to read search history");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(label: &str, ts: &str, temp: f64) -> HistoryEntry {
        HistoryEntry {
            label: label.to_string(),
            timestamp_utc: ts.to_string(),
            temperature_c: temp,
            description: "Clear sky".to_string(),
        }
    }

    fn store_in(dir: &TempDir) -> SqliteHistoryStore {
        let store = SqliteHistoryStore::new(dir.path().join("weather.db"));
        store.init().expect("init should succeed");
        store
    }

    #[test]
    fn init_twice_keeps_existing_rows() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(&entry("mumbai", "2024-01-01 10:00:00", 30.0)).unwrap();

        store.init().expect("second init should succeed");

        let rows = store.recent(DEFAULT_RECENT_LIMIT);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "mumbai");
    }

    #[test]
    fn init_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("nested/deeper/weather.db");
        let store = SqliteHistoryStore::new(&db_path);

        store.init().unwrap();

        assert!(db_path.exists());
    }

    #[test]
    fn recent_is_newest_first_and_limited() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        for (i, ts) in [
            "2024-01-01 10:00:00",
            "2024-01-03 10:00:00",
            "2024-01-02 10:00:00",
            "2024-01-05 10:00:00",
            "2024-01-04 10:00:00",
            "2024-01-06 10:00:00",
            "2023-12-31 23:59:59",
        ]
        .iter()
        .enumerate()
        {
            store.append(&entry(&format!("city{i}"), ts, i as f64)).unwrap();
        }

        let rows = store.recent(5);
        let stamps: Vec<_> = rows.iter().map(|r| r.timestamp_utc.as_str()).collect();
        assert_eq!(
            stamps,
            [
                "2024-01-06 10:00:00",
                "2024-01-05 10:00:00",
                "2024-01-04 10:00:00",
                "2024-01-03 10:00:00",
                "2024-01-02 10:00:00",
            ]
        );

        assert_eq!(store.recent(2).len(), 2);
        assert!(store.recent(0).is_empty());
        assert_eq!(store.recent(100).len(), 7);
    }

    #[test]
    fn repeated_searches_are_not_deduplicated() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.append(&entry("paris, fr", "2024-01-01 10:00:00", 12.0)).unwrap();
        store.append(&entry("paris, fr", "2024-01-01 10:00:00", 12.0)).unwrap();

        assert_eq!(store.recent(DEFAULT_RECENT_LIMIT).len(), 2);
    }

    #[test]
    fn same_second_rows_keep_insertion_order_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.append(&entry("first", "2024-01-01 10:00:00", 1.0)).unwrap();
        store.append(&entry("second", "2024-01-01 10:00:00", 2.0)).unwrap();

        let rows = store.recent(DEFAULT_RECENT_LIMIT);
        assert_eq!(rows[0].label, "second");
        assert_eq!(rows[1].label, "first");
    }

    #[test]
    fn recent_swallows_read_failures() {
        let dir = TempDir::new().unwrap();
        let store = SqliteHistoryStore::new(dir.path().join("missing.db"));

        assert!(store.recent(DEFAULT_RECENT_LIMIT).is_empty());
    }

    #[test]
    fn append_reports_failures() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened as a database file.
        let store = SqliteHistoryStore::new(dir.path());

        let err = store.append(&entry("x", "2024-01-01 10:00:00", 0.0));
        assert!(err.is_err());
    }

    #[test]
    fn append_without_init_fails() {
        let dir = TempDir::new().unwrap();
        let store = SqliteHistoryStore::new(dir.path().join("weather.db"));

        let err = store.append(&entry("x", "2024-01-01 10:00:00", 0.0)).unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)));
    }
}
