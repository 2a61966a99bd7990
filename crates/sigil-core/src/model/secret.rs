//! Per-role signing secrets.

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Secret material for one (role, secret slot) pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretEntry {
    /// Internal id of the owning role.
    pub role_id: String,

    /// Secret slot identifier.
    pub secret_id: String,

    /// Raw key material, base64 at rest.
    #[serde(with = "base64_bytes")]
    pub key: Vec<u8>,

    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

impl SecretEntry {
    /// Whether the secret's expiration is at or before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

// Key material must never reach logs.
impl fmt::Debug for SecretEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretEntry")
            .field("role_id", &self.role_id)
            .field("secret_id", &self.secret_id)
            .field("key", &format_args!("<{} bytes>", self.key.len()))
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

mod base64_bytes {
    use super::{Engine, STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry() -> SecretEntry {
        let now = Utc::now();
        SecretEntry {
            role_id: "r-1".into(),
            secret_id: "s-1".into(),
            key: vec![0xde, 0xad, 0xbe, 0xef],
            created_at: now,
            expires_at: now + Duration::seconds(60),
        }
    }

    #[test]
    fn test_key_is_base64_at_rest() {
        let json = serde_json::to_value(entry()).unwrap();
        assert_eq!(json["key"], "3q2+7w==");

        let back: SecretEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back.key, vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_debug_redacts_key() {
        let printed = format!("{:?}", entry());
        assert!(printed.contains("<4 bytes>"));
        assert!(!printed.contains("222"));
    }

    #[test]
    fn test_expiry() {
        let secret = entry();
        assert!(!secret.is_expired_at(secret.created_at));
        assert!(secret.is_expired_at(secret.expires_at));
    }
}
