//! Key/value storage abstraction for state rehydration.
//!
//! The surrounding state container persists and rehydrates slices of state
//! through this capability; the orchestrator itself never touches it. The
//! trait is deliberately minimal: three async operations over JSON values.
//!
//! # Implementations
//!
//! - `MemoryStore` (in `courier-storage`): volatile in-process map
//! - `FileStore` (in `courier-storage`): durable single-file JSON document,
//!   also used for the scratch variant rooted under the OS temp directory
//!
//! Backends are interchangeable and selected by a [`StorageKind`] tag in
//! configuration.
//!
//! # Dyn Compatibility
//!
//! Methods return explicit `Pin<Box<dyn Future>>` instead of `async fn` so
//! the store can be carried as `Arc<dyn StateStore>` by the container.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Underlying I/O failed (file unreadable, directory missing, ...).
    #[error("storage I/O error: {0}")]
    Io(String),

    /// A stored document could not be decoded as JSON.
    #[error("stored value could not be decoded: {0}")]
    Corrupt(String),
}

/// Which storage backend the container should use, selected in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageKind {
    /// Volatile in-process map; state does not survive the process.
    Memory,
    /// Durable JSON document at the given path.
    File {
        /// Where the document lives.
        path: PathBuf,
    },
    /// JSON document under the OS temp directory; survives the process but
    /// not the machine's cleanup cycle.
    Scratch {
        /// Distinguishes this container's scratch file from others.
        namespace: String,
    },
}

/// Asynchronous key/value store over JSON values.
pub trait StateStore: Send + Sync {
    /// Fetch the value stored under `key`, or `None` when absent.
    fn get<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Value>, StorageError>> + Send + 'a>>;

    /// Store `value` under `key`, replacing any existing value.
    fn set<'a>(
        &'a self,
        key: &'a str,
        value: Value,
    ) -> Pin<Box<dyn Future<Output = Result<(), StorageError>> + Send + 'a>>;

    /// Remove the value stored under `key`; removing an absent key is a no-op.
    fn remove<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), StorageError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_kind_round_trips_through_serde() {
        let kind = StorageKind::Scratch {
            namespace: "checkout".to_string(),
        };
        let encoded = serde_json::to_value(&kind).ok();
        assert_eq!(
            encoded,
            Some(serde_json::json!({ "backend": "scratch", "namespace": "checkout" }))
        );

        let decoded = encoded.and_then(|v| serde_json::from_value::<StorageKind>(v).ok());
        assert_eq!(decoded, Some(kind));
    }
}
