//! Durable single-file store.
//!
//! The whole key space lives in one JSON document, loaded on open and
//! rewritten on every mutation. Write volume here is configuration-sized
//! (a handful of rehydration slices), so whole-document rewrites are the
//! simple, durable choice; mutations go through a temp file + rename so a
//! crash mid-write never corrupts the document.

use courier_core::{StateStore, StorageError};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::sync::RwLock;

/// A [`StateStore`] persisted as one JSON document on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, Value>>,
}

impl FileStore {
    /// Open the document at `path`, creating parent directories as needed.
    /// A missing document opens as an empty store.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Io`] when the document or its directory is
    ///   unreadable.
    /// - [`StorageError::Corrupt`] when an existing document is not valid
    ///   JSON.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }

        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StorageError::Corrupt(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StorageError::Io(e.to_string())),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened state document");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Where the document lives.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &HashMap<String, Value>) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;

        let staged = self.path.with_extension("json.tmp");
        tokio::fs::write(&staged, &bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        tokio::fs::rename(&staged, &self.path)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))
    }
}

impl StateStore for FileStore {
    fn get<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Value>, StorageError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.entries.read().await.get(key).cloned()) })
    }

    fn set<'a>(
        &'a self,
        key: &'a str,
        value: Value,
    ) -> Pin<Box<dyn Future<Output = Result<(), StorageError>> + Send + 'a>> {
        Box::pin(async move {
            let mut entries = self.entries.write().await;
            entries.insert(key.to_string(), value);
            self.persist(&entries).await
        })
    }

    fn remove<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), StorageError>> + Send + 'a>> {
        Box::pin(async move {
            let mut entries = self.entries.write().await;
            if entries.remove(key).is_none() {
                return Ok(());
            }
            self.persist(&entries).await
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)] // tests are allowed to fail loudly

    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn a_missing_document_opens_empty() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let store = FileStore::open(dir.path().join("state.json")).await;
        let store = match store {
            Ok(store) => store,
            Err(e) => panic!("open must succeed on a missing document: {e}"),
        };
        assert_eq!(store.get("anything").await.ok(), Some(None));
    }

    #[tokio::test]
    async fn state_survives_a_reopen() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let path = dir.path().join("state.json");

        {
            let store = match FileStore::open(&path).await {
                Ok(store) => store,
                Err(e) => panic!("open: {e}"),
            };
            assert!(store.set("session", json!({ "user": 9 })).await.is_ok());
        }

        let reopened = match FileStore::open(&path).await {
            Ok(store) => store,
            Err(e) => panic!("reopen: {e}"),
        };
        assert_eq!(
            reopened.get("session").await.ok().flatten(),
            Some(json!({ "user": 9 }))
        );
    }

    #[tokio::test]
    async fn remove_persists_too() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let path = dir.path().join("state.json");

        {
            let store = match FileStore::open(&path).await {
                Ok(store) => store,
                Err(e) => panic!("open: {e}"),
            };
            assert!(store.set("a", json!(1)).await.is_ok());
            assert!(store.remove("a").await.is_ok());
        }

        let reopened = match FileStore::open(&path).await {
            Ok(store) => store,
            Err(e) => panic!("reopen: {e}"),
        };
        assert_eq!(reopened.get("a").await.ok(), Some(None));
    }

    #[tokio::test]
    async fn a_corrupt_document_is_reported() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, b"not json")
            .await
            .unwrap_or_else(|e| panic!("write: {e}"));

        assert!(matches!(
            FileStore::open(&path).await,
            Err(StorageError::Corrupt(_))
        ));
    }
}
