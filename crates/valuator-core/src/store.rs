//! Store trait for persisting collected data.
//!
//! This module defines the [`Store`] trait, a byte-oriented key/value interface
//! used to cache raw filing payloads and persist valuations.

use async_trait::async_trait;

use crate::{error::Result, types::Ticker};

/// Key prefix for raw filing payloads.
pub const FILINGS_PREFIX: &str = "filings";

/// Key prefix for serialized valuations.
pub const VALUATIONS_PREFIX: &str = "valuations";

/// Returns the store key of a ticker's raw filing payload.
#[must_use]
pub fn filings_key(ticker: &Ticker) -> String {
    format!("{}/{}", FILINGS_PREFIX, ticker)
}

/// Returns the store key of a ticker's serialized valuation.
#[must_use]
pub fn valuation_key(ticker: &Ticker) -> String {
    format!("{}/{}", VALUATIONS_PREFIX, ticker)
}

/// Trait for persisting bytes by key.
///
/// Implementations can store data in various backends (files, SQLite, a remote
/// service, in-memory, etc.).
#[async_trait]
pub trait Store: Send + Sync + std::fmt::Debug {
    /// Returns the name of this backend.
    fn name(&self) -> &str;

    /// Reads the bytes stored under `key`.
    ///
    /// Returns [`ValuatorError::NotFound`](crate::ValuatorError::NotFound) if the
    /// key has never been written.
    async fn read(&self, key: &str) -> Result<Vec<u8>>;

    /// Writes `data` under `key`, replacing any previous value.
    async fn write(&self, key: &str, data: &[u8]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_keys() {
        let ticker = Ticker::new("aapl");
        assert_eq!(filings_key(&ticker), "filings/AAPL");
        assert_eq!(valuation_key(&ticker), "valuations/AAPL");
    }
}
