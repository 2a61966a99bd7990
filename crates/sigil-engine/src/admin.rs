//! Administrative operations on roles and keys.
//!
//! This is the only path that writes [`RoleEntry`] and [`KeyEntry`] values.
//! Issuance and validation treat them as read-only.

use crate::authorizer::Authorizer;
use crate::error::EngineError;
use crate::key_store::KeyStore;
use crate::paths;
use crate::role_store::RoleStore;
use crate::secret_store::SecretStore;
use serde::Deserialize;
use sigil_core::{Claims, KeyEntry, RoleEntry};
use tracing::info;
use uuid::Uuid;

/// Caller-supplied role settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleDefinition {
    pub name: String,

    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub default_claims: Claims,

    #[serde(default)]
    pub allow_custom_claims: bool,

    pub default_ttl: u64,

    pub max_ttl: u64,

    #[serde(default)]
    pub secret_ttl: Option<u64>,
}

impl RoleDefinition {
    pub fn new(name: impl Into<String>, default_ttl: u64, max_ttl: u64) -> Self {
        Self {
            name: name.into(),
            key: None,
            default_claims: Claims::new(),
            allow_custom_claims: false,
            default_ttl,
            max_ttl,
            secret_ttl: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_default_claim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_claims.insert(name.into(), value.into());
        self
    }

    pub fn allow_custom_claims(mut self, allow: bool) -> Self {
        self.allow_custom_claims = allow;
        self
    }

    pub fn with_secret_ttl(mut self, secret_ttl: u64) -> Self {
        self.secret_ttl = Some(secret_ttl);
        self
    }
}

/// A newly created role and its plaintext role id.
///
/// The role id is not stored anywhere and cannot be recovered later; a lost
/// id can only be replaced with [`Admin::rotate_role_id`].
#[derive(Debug, Clone)]
pub struct CreatedRole {
    pub role: RoleEntry,
    pub role_id: String,
}

/// Role and key administration.
#[derive(Clone)]
pub struct Admin {
    roles: RoleStore,
    keys: KeyStore,
    secrets: SecretStore,
    authorizer: Authorizer,
    default_secret_ttl: u64,
}

impl Admin {
    pub(crate) fn new(
        roles: RoleStore,
        keys: KeyStore,
        secrets: SecretStore,
        authorizer: Authorizer,
        default_secret_ttl: u64,
    ) -> Self {
        Self {
            roles,
            keys,
            secrets,
            authorizer,
            default_secret_ttl,
        }
    }

    /// Create a role along with its initial secret.
    ///
    /// The secret is written before the role, so a role is never visible
    /// without the secret it was created with.
    pub async fn create_role(&self, definition: RoleDefinition) -> Result<CreatedRole, EngineError> {
        paths::check_name(&definition.name).map_err(|reason| EngineError::InvalidRole {
            name: definition.name.clone(),
            reason,
        })?;
        if self.roles.find(&definition.name).await?.is_some() {
            return Err(EngineError::RoleExists(definition.name));
        }
        if let Some(key) = definition.key.as_deref() {
            self.keys.get(key).await?;
        }

        let role_id = Uuid::new_v4().to_string();
        let role = RoleEntry {
            id: Uuid::new_v4().to_string(),
            authorization_hash: self.authorizer.authorization_hash(&role_id),
            secret_id: Uuid::new_v4().to_string(),
            name: definition.name,
            key: definition.key,
            default_claims: definition.default_claims,
            allow_custom_claims: definition.allow_custom_claims,
            default_ttl: definition.default_ttl,
            max_ttl: definition.max_ttl,
            secret_ttl: definition.secret_ttl,
        };
        check_role(&role)?;

        self.secrets
            .rotate(&role.id, &role.secret_id, self.secret_ttl(&role))
            .await
            .map_err(|e| EngineError::secret_unavailable(&role.name, e))?;
        self.roles.put(&role).await?;

        info!(role = %role.name, key = ?role.key, "Created role");
        Ok(CreatedRole { role, role_id })
    }

    /// Replace a role's claim, TTL and key settings. Its id, authorization
    /// hash and secret are kept.
    pub async fn update_role(&self, definition: RoleDefinition) -> Result<RoleEntry, EngineError> {
        let existing = self.roles.get(&definition.name).await?;
        if let Some(key) = definition.key.as_deref() {
            self.keys.get(key).await?;
        }

        let role = RoleEntry {
            key: definition.key,
            default_claims: definition.default_claims,
            allow_custom_claims: definition.allow_custom_claims,
            default_ttl: definition.default_ttl,
            max_ttl: definition.max_ttl,
            secret_ttl: definition.secret_ttl,
            ..existing
        };
        check_role(&role)?;

        self.roles.put(&role).await?;
        info!(role = %role.name, "Updated role");
        Ok(role)
    }

    /// Issue a new role id for `name`, invalidating the previous one.
    pub async fn rotate_role_id(&self, name: &str) -> Result<String, EngineError> {
        let mut role = self.roles.get(name).await?;
        let role_id = Uuid::new_v4().to_string();
        role.authorization_hash = self.authorizer.authorization_hash(&role_id);

        self.roles.put(&role).await?;
        info!(role = %role.name, "Rotated role id");
        Ok(role_id)
    }

    pub async fn get_role(&self, name: &str) -> Result<RoleEntry, EngineError> {
        self.roles.get(name).await
    }

    pub async fn list_roles(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.roles.list().await?)
    }

    /// Delete a role and its secret.
    ///
    /// The secret goes first: if that fails the role is still in place and
    /// the delete can be retried.
    pub async fn delete_role(&self, name: &str) -> Result<(), EngineError> {
        let role = self.roles.get(name).await?;

        self.secrets
            .delete(&role.id, &role.secret_id)
            .await
            .map_err(|e| EngineError::secret_unavailable(&role.name, e))?;
        self.roles.delete(&role.name).await?;

        info!(role = %role.name, "Deleted role");
        Ok(())
    }

    /// Create or replace a key.
    pub async fn put_key(&self, key: KeyEntry) -> Result<KeyEntry, EngineError> {
        paths::check_name(&key.name).map_err(|reason| EngineError::InvalidKey {
            name: key.name.clone(),
            reason,
        })?;

        self.keys.put(&key).await?;
        info!(key = %key.name, algorithm = %key.algorithm, "Stored key");
        Ok(key)
    }

    pub async fn get_key(&self, name: &str) -> Result<KeyEntry, EngineError> {
        self.keys.get(name).await
    }

    pub async fn list_keys(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.keys.list().await?)
    }

    /// Delete a key that no role references.
    ///
    /// The reference scan and the delete are separate storage operations, so
    /// a role created or updated concurrently can still end up bound to the
    /// deleted key; issuing for it then fails with `KeyNotFound`.
    pub async fn delete_key(&self, name: &str) -> Result<(), EngineError> {
        let key = self.keys.get(name).await?;

        let mut referencing = Vec::new();
        for role_name in self.roles.list().await? {
            let Some(role) = self.roles.find(&role_name).await? else {
                continue;
            };
            if role.key.as_deref() == Some(key.name.as_str()) {
                referencing.push(role.name);
            }
        }
        if !referencing.is_empty() {
            return Err(EngineError::KeyInUse {
                key: key.name,
                roles: referencing,
            });
        }

        self.keys.delete(&key.name).await?;
        info!(key = %key.name, "Deleted key");
        Ok(())
    }

    fn secret_ttl(&self, role: &RoleEntry) -> u64 {
        role.secret_ttl.unwrap_or(self.default_secret_ttl)
    }
}

fn check_role(role: &RoleEntry) -> Result<(), EngineError> {
    role.check_ttl_bounds()
        .map_err(|reason| EngineError::InvalidRole {
            name: role.name.clone(),
            reason,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authorizer::Salt;
    use sigil_core::SigningAlgorithm;
    use sigil_storage::{MemoryStorage, Storage};
    use std::sync::Arc;

    fn admin() -> (Admin, SecretStore) {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let secrets = SecretStore::new(storage.clone(), 32);
        let salt = Salt::from_bytes(b"test-salt").unwrap();
        let admin = Admin::new(
            RoleStore::new(storage.clone()),
            KeyStore::new(storage),
            secrets.clone(),
            Authorizer::new(Arc::new(salt)),
            3600,
        );
        (admin, secrets)
    }

    #[tokio::test]
    async fn test_create_role_persists_role_and_secret() {
        let (admin, secrets) = admin();
        let created = admin
            .create_role(RoleDefinition::new("billing", 600, 3600).with_default_claim("scope", "read"))
            .await
            .unwrap();

        assert_eq!(admin.get_role("billing").await.unwrap(), created.role);
        assert_ne!(created.role.authorization_hash, created.role_id);
        assert!(!created.role.authorization_hash.contains(&created.role_id));

        let secret = secrets
            .read(&created.role.id, &created.role.secret_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(secret.expires_at - secret.created_at, chrono::Duration::hours(1));
    }

    #[tokio::test]
    async fn test_create_role_rejections() {
        let (admin, _) = admin();
        admin
            .create_role(RoleDefinition::new("billing", 600, 3600))
            .await
            .unwrap();

        let err = admin
            .create_role(RoleDefinition::new("billing", 600, 3600))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::RoleExists(name) if name == "billing"));

        let err = admin
            .create_role(RoleDefinition::new("audit", 7200, 3600))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRole { .. }));

        let err = admin
            .create_role(RoleDefinition::new("audit", 600, 3600).with_key("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::KeyNotFound { key } if key == "missing"));

        let err = admin
            .create_role(RoleDefinition::new("bad/name", 600, 3600))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRole { .. }));

        assert_eq!(admin.list_roles().await.unwrap(), vec!["billing"]);
    }

    #[tokio::test]
    async fn test_update_role_keeps_identity() {
        let (admin, _) = admin();
        let created = admin
            .create_role(RoleDefinition::new("billing", 600, 3600))
            .await
            .unwrap();

        let updated = admin
            .update_role(RoleDefinition::new("billing", 60, 120).allow_custom_claims(true))
            .await
            .unwrap();
        assert_eq!(updated.id, created.role.id);
        assert_eq!(updated.secret_id, created.role.secret_id);
        assert_eq!(updated.authorization_hash, created.role.authorization_hash);
        assert!(updated.allow_custom_claims);
        assert_eq!(updated.max_ttl, 120);

        let err = admin
            .update_role(RoleDefinition::new("billing", 600, 60))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRole { .. }));
    }

    #[tokio::test]
    async fn test_rotate_role_id_changes_hash() {
        let (admin, _) = admin();
        let created = admin
            .create_role(RoleDefinition::new("billing", 600, 3600))
            .await
            .unwrap();

        let new_id = admin.rotate_role_id("billing").await.unwrap();
        assert_ne!(new_id, created.role_id);

        let role = admin.get_role("billing").await.unwrap();
        assert!(admin.authorizer.authorize(&role, &new_id));
        assert!(!admin.authorizer.authorize(&role, &created.role_id));
    }

    #[tokio::test]
    async fn test_delete_role_removes_secret() {
        let (admin, secrets) = admin();
        let created = admin
            .create_role(RoleDefinition::new("billing", 600, 3600))
            .await
            .unwrap();

        admin.delete_role("billing").await.unwrap();

        assert!(matches!(
            admin.get_role("billing").await,
            Err(EngineError::RoleNotFound { .. })
        ));
        assert!(
            secrets
                .read(&created.role.id, &created.role.secret_id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_key_lifecycle() {
        let (admin, _) = admin();
        let key = KeyEntry::new("primary", SigningAlgorithm::HS384);
        admin.put_key(key.clone()).await.unwrap();
        assert_eq!(admin.get_key("primary").await.unwrap(), key);
        assert_eq!(admin.list_keys().await.unwrap(), vec!["primary"]);

        admin.delete_key("primary").await.unwrap();
        assert!(admin.list_keys().await.unwrap().is_empty());

        let err = admin
            .put_key(KeyEntry::new("../escape", SigningAlgorithm::HS256))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidKey { .. }));
    }

    #[tokio::test]
    async fn test_delete_referenced_key() {
        let (admin, _) = admin();
        admin
            .put_key(KeyEntry::new("primary", SigningAlgorithm::HS256))
            .await
            .unwrap();
        for name in ["billing", "audit"] {
            admin
                .create_role(RoleDefinition::new(name, 600, 3600).with_key("primary"))
                .await
                .unwrap();
        }

        let err = admin.delete_key("primary").await.unwrap_err();
        match err {
            EngineError::KeyInUse { key, roles } => {
                assert_eq!(key, "primary");
                assert_eq!(roles, vec!["audit", "billing"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(admin.get_key("primary").await.is_ok());
    }

    #[test]
    fn test_definition_deserializes() {
        let definition: RoleDefinition = serde_json::from_str(
            r#"{"name": "billing", "default_ttl": 600, "max_ttl": 3600, "allow_custom_claims": true}"#,
        )
        .unwrap();
        assert_eq!(
            definition,
            RoleDefinition::new("billing", 600, 3600).allow_custom_claims(true)
        );
    }
}
