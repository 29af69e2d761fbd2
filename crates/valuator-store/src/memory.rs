//! In-memory store implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use valuator_core::{Result, Store, ValuatorError};

/// Simple in-memory store for testing and development.
///
/// Data is kept in a `RwLock`-protected `HashMap` and is lost when the store is
/// dropped. Bytes are copied on read and write.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored keys in ascending order.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl Store for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    #[instrument(skip(self))]
    async fn read(&self, key: &str) -> Result<Vec<u8>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(data) => {
                debug!("Store hit");
                Ok(data.clone())
            }
            None => {
                debug!("Store miss");
                Err(ValuatorError::NotFound(key.to_string()))
            }
        }
    }

    #[instrument(skip(self, data), fields(bytes = data.len()))]
    async fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), data.to_vec());
        debug!("Stored entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = InMemoryStore::new();

        // Initially no data
        assert!(store.read("valuations/AAPL").await.unwrap_err().is_not_found());

        store.write("valuations/AAPL", b"{}").await.unwrap();
        assert_eq!(store.read("valuations/AAPL").await.unwrap(), b"{}");

        // Writes replace
        store.write("valuations/AAPL", b"[]").await.unwrap();
        assert_eq!(store.read("valuations/AAPL").await.unwrap(), b"[]");
    }

    #[tokio::test]
    async fn test_memory_store_keys() {
        let store = InMemoryStore::new();
        store.write("valuations/MSFT", b"1").await.unwrap();
        store.write("filings/MSFT", b"2").await.unwrap();

        assert_eq!(store.keys().await, vec!["filings/MSFT", "valuations/MSFT"]);
        assert!(store.read("filings/AAPL").await.is_err());
    }
}
