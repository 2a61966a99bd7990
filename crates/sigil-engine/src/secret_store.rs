//! Per-role secret storage and rotation.

use crate::paths;
use chrono::{DateTime, Duration, Utc};
use sigil_core::SecretEntry;
use sigil_storage::{Storage, StorageResult, get_json, put_json};
use sigil_token::generate_key_material;
use std::sync::Arc;

/// Stores one [`SecretEntry`] per (role id, secret id) slot.
#[derive(Clone)]
pub struct SecretStore {
    storage: Arc<dyn Storage>,
    key_length: usize,
}

impl SecretStore {
    pub fn new(storage: Arc<dyn Storage>, key_length: usize) -> Self {
        Self {
            storage,
            key_length,
        }
    }

    /// Read the secret in a slot. Expired entries are returned as-is.
    pub async fn read(&self, role_id: &str, secret_id: &str) -> StorageResult<Option<SecretEntry>> {
        get_json(self.storage.as_ref(), &paths::secret(role_id, secret_id)).await
    }

    /// Write fresh key material into a slot, replacing whatever was there.
    pub async fn rotate(
        &self,
        role_id: &str,
        secret_id: &str,
        ttl_secs: u64,
    ) -> StorageResult<SecretEntry> {
        let created_at = Utc::now();
        let secret = SecretEntry {
            role_id: role_id.to_string(),
            secret_id: secret_id.to_string(),
            key: generate_key_material(self.key_length),
            created_at,
            expires_at: expiry(created_at, ttl_secs),
        };
        put_json(
            self.storage.as_ref(),
            &paths::secret(role_id, secret_id),
            &secret,
        )
        .await?;
        Ok(secret)
    }

    pub async fn delete(&self, role_id: &str, secret_id: &str) -> StorageResult<()> {
        self.storage
            .delete(&paths::secret(role_id, secret_id))
            .await
    }
}

fn expiry(created_at: DateTime<Utc>, ttl_secs: u64) -> DateTime<Utc> {
    i64::try_from(ttl_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| created_at.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
