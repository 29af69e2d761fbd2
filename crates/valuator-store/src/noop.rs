//! No-op store implementation.

use async_trait::async_trait;
use tracing::trace;
use valuator_core::{Result, Store, ValuatorError};

/// A store that doesn't keep anything.
///
/// Every `read` reports [`ValuatorError::NotFound`] and every `write` succeeds.
/// Useful for disabling persistence or testing code paths without cache hits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl NoopStore {
    /// Create a new no-op store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Store for NoopStore {
    fn name(&self) -> &str {
        "noop"
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>> {
        trace!(key, "NoopStore: read called, returning NotFound");
        Err(ValuatorError::NotFound(key.to_string()))
    }

    async fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        trace!(key, bytes = data.len(), "NoopStore: write called, doing nothing");
        Ok(())
    }
}
