//! SQLite-based store implementation.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, instrument};
use valuator_core::{Result, Store, ValuatorError};

fn store_err(e: impl std::fmt::Display) -> ValuatorError {
    ValuatorError::Persistence(e.to_string())
}

/// SQLite-based store.
///
/// Every key is one row of a single `store_entries` table, which keeps data
/// across application restarts.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SQLite store at the given path.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema creation fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(store_err)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create an in-memory SQLite store.
    ///
    /// Useful for testing; data is lost when the store is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(store_err)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn.lock().map_err(store_err)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS store_entries (
                key TEXT PRIMARY KEY NOT NULL,
                data BLOB NOT NULL,
                written_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(store_err)?;

        debug!("SQLite store schema initialized");
        Ok(())
    }
}

#[async_trait]
impl Store for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    #[instrument(skip(self))]
    async fn read(&self, key: &str) -> Result<Vec<u8>> {
        let conn = self.conn.lock().map_err(store_err)?;

        let data = conn
            .query_row(
                "SELECT data FROM store_entries WHERE key = ?1",
                params![key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()
            .map_err(store_err)?;

        match data {
            Some(data) => {
                debug!(bytes = data.len(), "Store hit");
                Ok(data)
            }
            None => {
                debug!("Store miss");
                Err(ValuatorError::NotFound(key.to_string()))
            }
        }
    }

    #[instrument(skip(self, data), fields(bytes = data.len()))]
    async fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        let written_at = Utc::now().to_rfc3339();
        let conn = self.conn.lock().map_err(store_err)?;

        conn.execute(
            "INSERT OR REPLACE INTO store_entries (key, data, written_at)
             VALUES (?1, ?2, ?3)",
            params![key, data, written_at],
        )
        .map_err(store_err)?;

        debug!("Stored entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_store_initialization() {
        let store = SqliteStore::in_memory();
        assert!(store.is_ok());
    }

    #[tokio::test]
    async fn test_sqlite_store_round_trip() {
        let store = SqliteStore::in_memory().unwrap();

        // Initially no data
        assert!(store.read("filings/AAPL").await.unwrap_err().is_not_found());

        store.write("filings/AAPL", &[0, 159, 146, 150]).await.unwrap();
        assert_eq!(store.read("filings/AAPL").await.unwrap(), vec![0, 159, 146, 150]);

        store.write("filings/AAPL", b"replaced").await.unwrap();
        assert_eq!(store.read("filings/AAPL").await.unwrap(), b"replaced");
    }

    #[tokio::test]
    async fn test_sqlite_store_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("valuator.db");

        SqliteStore::new(&path)
            .unwrap()
            .write("valuations/KO", b"{}")
            .await
            .unwrap();

        let reopened = SqliteStore::new(&path).unwrap();
        assert_eq!(reopened.read("valuations/KO").await.unwrap(), b"{}");
    }
}
