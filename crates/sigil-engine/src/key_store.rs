//! Signing-key persistence.

use crate::error::EngineError;
use crate::paths;
use sigil_core::{KeyEntry, RoleEntry};
use sigil_storage::{Storage, StorageResult, get_json, put_json};
use std::sync::Arc;

/// Reads and writes [`KeyEntry`] values.
#[derive(Clone)]
pub struct KeyStore {
    storage: Arc<dyn Storage>,
}

impl KeyStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Look up a key, reporting absence as [`EngineError::KeyNotFound`].
    pub async fn get(&self, name: &str) -> Result<KeyEntry, EngineError> {
        self.find(name)
            .await?
            .ok_or_else(|| EngineError::key_not_found(name))
    }

    pub async fn find(&self, name: &str) -> StorageResult<Option<KeyEntry>> {
        if paths::check_name(name).is_err() {
            return Ok(None);
        }
        get_json(self.storage.as_ref(), &paths::key(name)).await
    }

    /// Resolve the key a role is bound to. Roles without a key yield `None`.
    pub async fn get_for_role(&self, role: &RoleEntry) -> Result<Option<KeyEntry>, EngineError> {
        match role.key.as_deref() {
            Some(name) => self.get(name).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn put(&self, key: &KeyEntry) -> StorageResult<()> {
        put_json(self.storage.as_ref(), &paths::key(&key.name), key).await
    }

    pub async fn delete(&self, name: &str) -> StorageResult<()> {
        self.storage.delete(&paths::key(name)).await
    }

    pub async fn list(&self) -> StorageResult<Vec<String>> {
        self.storage.list(paths::KEY_PREFIX).await
    }
}
