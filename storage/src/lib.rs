//! # Courier Storage
//!
//! Key/value storage backends for state rehydration, implementing the
//! [`StateStore`](courier_core::StateStore) trait from `courier-core`.
//!
//! Three interchangeable backends, selected by a
//! [`StorageKind`](courier_core::StorageKind) configuration tag:
//!
//! - [`MemoryStore`] — volatile in-process map
//! - [`FileStore`] — durable single-file JSON document
//! - the scratch variant — a [`FileStore`] under the OS temp directory,
//!   namespaced per container
//!
//! # Example
//!
//! ```no_run
//! use courier_core::StorageKind;
//! use courier_storage::open_store;
//!
//! async fn example() -> Result<(), courier_core::StorageError> {
//!     let store = open_store(StorageKind::Memory).await?;
//!     store.set("session", serde_json::json!({ "user": 1 })).await?;
//!     Ok(())
//! }
//! ```

use courier_core::{StateStore, StorageError, StorageKind};
use std::sync::Arc;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Open the backend selected by a configuration tag.
///
/// # Errors
///
/// Returns [`StorageError`] when a file-backed document cannot be opened or
/// decoded; the memory backend never fails.
pub async fn open_store(kind: StorageKind) -> Result<Arc<dyn StateStore>, StorageError> {
    match kind {
        StorageKind::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageKind::File { path } => Ok(Arc::new(FileStore::open(path).await?)),
        StorageKind::Scratch { namespace } => {
            let path = std::env::temp_dir().join(format!("courier-{namespace}.json"));
            Ok(Arc::new(FileStore::open(path).await?))
        }
    }
}
