//! Role-id authorization.
//!
//! Callers prove access to a role by presenting its role id. Only a keyed
//! hash of that id is stored: HMAC-SHA256 under a process-wide salt, hex
//! encoded. The salt lives in storage and is loaded once, when the engine is
//! built.

use crate::error::EngineError;
use crate::paths;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use sigil_core::RoleEntry;
use sigil_storage::Storage;
use sigil_token::generate_key_material;
use std::fmt;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::info;

type HmacSha256 = Hmac<Sha256>;

/// Length of a freshly generated salt, in bytes.
pub const SALT_LENGTH: usize = 32;

/// Keying material for authorization hashes.
#[derive(Clone)]
pub struct Salt {
    mac: HmacSha256,
}

impl Salt {
    /// Build a salt from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        if bytes.is_empty() {
            return Err(EngineError::InvalidSalt("salt is empty".to_string()));
        }
        let mac = HmacSha256::new_from_slice(bytes)
            .map_err(|e| EngineError::InvalidSalt(e.to_string()))?;
        Ok(Self { mac })
    }

    /// Load the stored salt, creating and persisting one if none exists.
    ///
    /// After a create the stored value is read back, so two processes that
    /// race on an empty store agree on whichever salt landed last.
    pub async fn load_or_create(storage: &dyn Storage) -> Result<Self, EngineError> {
        if let Some(bytes) = storage.get(paths::SALT).await? {
            return Self::from_bytes(&bytes);
        }

        storage
            .put(paths::SALT, generate_key_material(SALT_LENGTH))
            .await?;
        info!("Generated new authorization salt");

        let bytes = storage
            .get(paths::SALT)
            .await?
            .ok_or_else(|| EngineError::InvalidSalt("salt vanished after creation".to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Hex-encoded HMAC-SHA256 of `data`.
    pub fn hmac(&self, data: &[u8]) -> String {
        let mut mac = self.mac.clone();
        mac.update(data);
        hex::encode(mac.finalize().into_bytes())
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Salt(<redacted>)")
    }
}

/// Checks caller role ids against stored authorization hashes.
#[derive(Debug, Clone)]
pub struct Authorizer {
    salt: Arc<Salt>,
}

impl Authorizer {
    pub fn new(salt: Arc<Salt>) -> Self {
        Self { salt }
    }

    /// The value stored as `authorization_hash` for `role_id`.
    pub fn authorization_hash(&self, role_id: &str) -> String {
        self.salt.hmac(role_id.as_bytes())
    }

    /// Whether `caller_role_id` is the role's id. Comparison is constant time.
    pub fn authorize(&self, role: &RoleEntry, caller_role_id: &str) -> bool {
        let presented = self.authorization_hash(caller_role_id);
        presented
            .as_bytes()
            .ct_eq(role.authorization_hash.as_bytes())
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigil_core::Claims;
    use sigil_storage::MemoryStorage;

    fn role_with_hash(hash: String) -> RoleEntry {
        RoleEntry {
            name: "billing".into(),
            id: "r-1".into(),
            key: None,
            default_claims: Claims::new(),
            allow_custom_claims: false,
            default_ttl: 600,
            max_ttl: 3600,
            authorization_hash: hash,
            secret_id: "s-1".into(),
            secret_ttl: None,
        }
    }

    fn authorizer(salt: &[u8]) -> Authorizer {
        Authorizer::new(Arc::new(Salt::from_bytes(salt).unwrap()))
    }

    #[test]
    fn test_authorize_exact_id_only() {
        let authorizer = authorizer(b"0123456789abcdef0123456789abcdef");
        let role = role_with_hash(authorizer.authorization_hash("c0ffee-id"));

        assert!(authorizer.authorize(&role, "c0ffee-id"));
        for wrong in ["", "c0ffee", "c0ffee-id ", "C0FFEE-ID", "other"] {
            assert!(!authorizer.authorize(&role, wrong), "accepted {wrong:?}");
        }
    }

    #[test]
    fn test_hash_depends_on_salt() {
        let a = authorizer(b"salt-a");
        let b = authorizer(b"salt-b");
        assert_ne!(a.authorization_hash("id"), b.authorization_hash("id"));

        let role = role_with_hash(a.authorization_hash("id"));
        assert!(!b.authorize(&role, "id"));
    }

    #[test]
    fn test_hash_is_hex_sha256() {
        let hash = authorizer(b"salt").authorization_hash("id");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_empty_salt_rejected() {
        assert!(matches!(
            Salt::from_bytes(&[]),
            Err(EngineError::InvalidSalt(_))
        ));
    }

    #[tokio::test]
    async fn test_salt_created_once() {
        let storage = MemoryStorage::new();
        let first = Salt::load_or_create(&storage).await.unwrap();
        let stored = storage.get(paths::SALT).await.unwrap().unwrap();
        assert_eq!(stored.len(), SALT_LENGTH);

        let second = Salt::load_or_create(&storage).await.unwrap();
        assert_eq!(first.hmac(b"id"), second.hmac(b"id"));
        assert_eq!(storage.get(paths::SALT).await.unwrap().unwrap(), stored);
    }

    #[test]
    fn test_debug_redacts_salt() {
        let printed = format!("{:?}", authorizer(b"super-secret"));
        assert!(!printed.contains("super-secret"));
    }
}
