//! Role persistence.

use crate::error::EngineError;
use crate::paths;
use sigil_core::RoleEntry;
use sigil_storage::{Storage, StorageResult, get_json, put_json};
use std::sync::Arc;

/// Reads and writes [`RoleEntry`] values.
#[derive(Clone)]
pub struct RoleStore {
    storage: Arc<dyn Storage>,
}

impl RoleStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Look up a role, reporting absence as [`EngineError::RoleNotFound`].
    pub async fn get(&self, name: &str) -> Result<RoleEntry, EngineError> {
        self.find(name)
            .await?
            .ok_or_else(|| EngineError::role_not_found(name))
    }

    /// Look up a role. Names that cannot exist are reported as absent.
    pub async fn find(&self, name: &str) -> StorageResult<Option<RoleEntry>> {
        if paths::check_name(name).is_err() {
            return Ok(None);
        }
        get_json(self.storage.as_ref(), &paths::role(name)).await
    }

    pub async fn put(&self, role: &RoleEntry) -> StorageResult<()> {
        put_json(self.storage.as_ref(), &paths::role(&role.name), role).await
    }

    pub async fn delete(&self, name: &str) -> StorageResult<()> {
        self.storage.delete(&paths::role(name)).await
    }

    /// Names of all stored roles.
    pub async fn list(&self) -> StorageResult<Vec<String>> {
        self.storage.list(paths::ROLE_PREFIX).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigil_core::Claims;
    use sigil_storage::MemoryStorage;

    fn role(name: &str) -> RoleEntry {
        RoleEntry {
            name: name.into(),
            id: format!("{name}-id"),
            key: None,
            default_claims: Claims::new(),
            allow_custom_claims: false,
            default_ttl: 600,
            max_ttl: 3600,
            authorization_hash: "00".into(),
            secret_id: "s-1".into(),
            secret_ttl: None,
        }
    }

    #[tokio::test]
    async fn test_get_missing_role() {
        let store = RoleStore::new(Arc::new(MemoryStorage::new()));
        let err = store.get("billing").await.unwrap_err();
        assert!(matches!(err, EngineError::RoleNotFound { name } if name == "billing"));
    }

    #[tokio::test]
    async fn test_put_get_list_delete() {
        let store = RoleStore::new(Arc::new(MemoryStorage::new()));
        store.put(&role("billing")).await.unwrap();
        store.put(&role("audit")).await.unwrap();

        assert_eq!(store.get("billing").await.unwrap(), role("billing"));
        assert_eq!(store.list().await.unwrap(), vec!["audit", "billing"]);

        store.delete("billing").await.unwrap();
        assert!(store.find("billing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_name_is_not_found() {
        let store = RoleStore::new(Arc::new(MemoryStorage::new()));
        assert!(store.find("../salt").await.unwrap().is_none());
    }
}
