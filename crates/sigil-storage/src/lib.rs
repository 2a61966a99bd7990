//! # sigil-storage
//!
//! Flat key-value storage consumed by the Sigil role, key and secret stores.
//!
//! Paths are `/`-separated strings; their layout is owned by the callers.
//! Every `put` replaces the whole value at a path in one step, and no
//! operation spans more than one path.
//!
//! | Backend | Persistence |
//! |---------|-------------|
//! | [`MemoryStorage`] | Process lifetime |
//! | [`FileStorage`] | One file per path under a root directory |

pub mod error;
pub mod file;
pub mod json;
pub mod memory;

use async_trait::async_trait;
use sigil_core::config::{StorageBackend, StorageConfig};
use std::sync::Arc;

pub use error::{StorageError, StorageResult};
pub use file::FileStorage;
pub use json::{get_json, put_json};
pub use memory::MemoryStorage;

/// Key-value storage backend.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the value at `path`, if any.
    async fn get(&self, path: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Write `value` at `path`, replacing any previous value.
    async fn put(&self, path: &str, value: Vec<u8>) -> StorageResult<()>;

    /// Remove the value at `path`. Removing an absent path succeeds.
    async fn delete(&self, path: &str) -> StorageResult<()>;

    /// List the names directly under `prefix` (which should end in `/`),
    /// relative to it and sorted.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>>;
}

/// Create a storage backend based on configuration.
pub fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new())),
        StorageBackend::File => Ok(Arc::new(FileStorage::new(&config.path)?)),
    }
}
