//! Store selection from configuration.

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::Arc};
use tracing::debug;
use valuator_core::{Result, Store};

use crate::{FileStore, InMemoryStore, NoopStore, RemoteStore};

/// Which backend to persist to.
///
/// Deserializes from a tagged object, e.g. `{"kind": "file", "root": "data"}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Persist nothing.
    #[default]
    None,
    /// One file per key below `root`.
    File {
        /// Root directory.
        root: PathBuf,
    },
    /// Process memory.
    Memory,
    /// A SQLite database file.
    Sqlite {
        /// Database file path.
        path: PathBuf,
    },
    /// A remote key/value service.
    Remote {
        /// Base URL keys are appended to.
        base_url: String,
    },
}

impl StoreConfig {
    /// Opens the configured backend.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be opened, or
    /// [`ValuatorError::NotSupported`](valuator_core::ValuatorError::NotSupported)
    /// for SQLite when the `sqlite` feature is disabled.
    pub fn open(&self) -> Result<Arc<dyn Store>> {
        let store: Arc<dyn Store> = match self {
            Self::None => Arc::new(NoopStore::new()),
            Self::File { root } => Arc::new(FileStore::new(root.clone())),
            Self::Memory => Arc::new(InMemoryStore::new()),
            Self::Sqlite { path } => open_sqlite(path)?,
            Self::Remote { base_url } => Arc::new(RemoteStore::new(base_url.clone())?),
        };
        debug!(store = store.name(), "Opened store");
        Ok(store)
    }
}

#[cfg(feature = "sqlite")]
fn open_sqlite(path: &std::path::Path) -> Result<Arc<dyn Store>> {
    Ok(Arc::new(crate::SqliteStore::new(path)?))
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_path: &std::path::Path) -> Result<Arc<dyn Store>> {
    Err(valuator_core::ValuatorError::NotSupported(
        "SQLite store requires the `sqlite` feature".to_string(),
    ))
}
