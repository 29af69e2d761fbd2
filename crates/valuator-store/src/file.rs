//! File system store implementation.

use async_trait::async_trait;
use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};
use tracing::{debug, instrument};
use valuator_core::{Result, Store, ValuatorError};

/// Store that keeps each key in its own file below a root directory.
///
/// A key such as `filings/AAPL` maps to `<root>/filings/AAPL`. Parent
/// directories are created on write.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a key to a path, refusing keys that would escape the root.
    fn path_of(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let valid = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            return Err(ValuatorError::InvalidParameter(format!("invalid store key: {}", key)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl Store for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn read(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_of(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => {
                debug!(bytes = data.len(), "Read store file");
                Ok(data)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ValuatorError::NotFound(key.to_string())),
            Err(e) => Err(ValuatorError::Persistence(format!("{}: {}", path.display(), e))),
        }
    }

    #[instrument(skip(self, data), fields(root = %self.root.display(), bytes = data.len()))]
    async fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.path_of(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ValuatorError::Persistence(format!("{}: {}", parent.display(), e)))?;
        }
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| ValuatorError::Persistence(format!("{}: {}", path.display(), e)))?;
        debug!("Wrote store file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.read("filings/AAPL").await.unwrap_err().is_not_found());

        store.write("filings/AAPL", b"raw payload").await.unwrap();
        assert_eq!(store.read("filings/AAPL").await.unwrap(), b"raw payload");
        assert!(dir.path().join("filings").join("AAPL").is_file());
    }

    #[tokio::test]
    async fn test_file_store_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        store.write("valuations/KO", b"first").await.unwrap();
        store.write("valuations/KO", b"second").await.unwrap();
        assert_eq!(store.read("valuations/KO").await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_file_store_rejects_escaping_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        for key in ["", "../outside", "/etc/passwd", "filings/../../x"] {
            assert!(
                matches!(
                    store.write(key, b"x").await,
                    Err(ValuatorError::InvalidParameter(_))
                ),
                "key {:?} accepted",
                key
            );
        }
    }
}
