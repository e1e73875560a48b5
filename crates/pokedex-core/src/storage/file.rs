// ── File-backed key-value store ──
//
// One JSON file per key under a data directory. Durability is
// best-effort; a failed write leaves the previous file contents.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{Storage, StorageError};

/// Key-value store persisting each key as `<root>/<key>.json`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to its backing file, replacing anything that could
    /// escape the root directory.
    fn file_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{safe}.json"))
    }

    fn io_err(key: &str, source: std::io::Error) -> StorageError {
        StorageError::Io {
            key: key.to_owned(),
            source,
        }
    }
}

#[async_trait]
impl Storage for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.file_path(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_err(key, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Self::io_err(key, e))?;

        let path = self.file_path(key);
        debug!(key, path = %path.display(), "writing store entry");
        tokio::fs::write(&path, value)
            .await
            .map_err(|e| Self::io_err(key, e))
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.file_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_err(key, e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.get("teams").await.unwrap().is_none());

        store.set("teams", "[]").await.unwrap();
        assert_eq!(store.get("teams").await.unwrap().as_deref(), Some("[]"));

        store.remove("teams").await.unwrap();
        assert!(store.get("teams").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_missing_key_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.remove("never_written").await.unwrap();
    }

    #[tokio::test]
    async fn hostile_key_stays_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("../escape", "x").await.unwrap();
        assert!(dir.path().join("___escape.json").exists());
    }
}
