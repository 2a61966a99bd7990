//! Role configuration.

use super::Claims;
use serde::{Deserialize, Serialize};

/// A named issuance policy.
///
/// The caller-facing role id is never stored; only its keyed hash
/// (`authorization_hash`) is. `id` is an internal identifier that scopes the
/// role's secrets in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEntry {
    /// Role name (storage identity).
    pub name: String,

    /// Internal identifier owning the role's secrets.
    pub id: String,

    /// Name of the bound key; `None` uses the engine's default algorithm.
    #[serde(default)]
    pub key: Option<String>,

    /// Claims placed in every token issued for this role.
    #[serde(default)]
    pub default_claims: Claims,

    /// Whether caller-supplied claims are merged over `default_claims`.
    #[serde(default)]
    pub allow_custom_claims: bool,

    /// Token lifetime when the caller does not request one, in seconds.
    pub default_ttl: u64,

    /// Upper bound for requested token lifetimes, in seconds.
    pub max_ttl: u64,

    /// Hex HMAC-SHA256 of the caller-facing role id.
    pub authorization_hash: String,

    /// Identifier of the role's current secret slot.
    pub secret_id: String,

    /// Secret lifetime in seconds; `None` uses the engine default.
    #[serde(default)]
    pub secret_ttl: Option<u64>,
}

impl RoleEntry {
    /// Check the TTL invariants.
    pub fn check_ttl_bounds(&self) -> Result<(), String> {
        if self.max_ttl == 0 {
            return Err("max_ttl must be greater than zero".to_string());
        }
        if self.default_ttl == 0 {
            return Err("default_ttl must be greater than zero".to_string());
        }
        if self.default_ttl > self.max_ttl {
            return Err(format!(
                "default_ttl ({}) must not exceed max_ttl ({})",
                self.default_ttl, self.max_ttl
            ));
        }
        if self.secret_ttl == Some(0) {
            return Err("secret_ttl must be greater than zero when set".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(default_ttl: u64, max_ttl: u64) -> RoleEntry {
        RoleEntry {
            name: "billing".into(),
            id: "3f1c".into(),
            key: None,
            default_claims: Claims::new(),
            allow_custom_claims: false,
            default_ttl,
            max_ttl,
            authorization_hash: String::new(),
            secret_id: "s-1".into(),
            secret_ttl: None,
        }
    }

    #[test]
    fn test_ttl_bounds() {
        assert!(role(600, 3600).check_ttl_bounds().is_ok());
        assert!(role(3600, 3600).check_ttl_bounds().is_ok());
        assert!(role(7200, 3600).check_ttl_bounds().is_err());
        assert!(role(0, 3600).check_ttl_bounds().is_err());
        assert!(role(600, 0).check_ttl_bounds().is_err());
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{
            "name": "billing",
            "id": "3f1c",
            "default_ttl": 600,
            "max_ttl": 3600,
            "authorization_hash": "ab",
            "secret_id": "s-1"
        }"#;
        let role: RoleEntry = serde_json::from_str(json).unwrap();
        assert!(role.key.is_none());
        assert!(role.default_claims.is_empty());
        assert!(!role.allow_custom_claims);
        assert!(role.secret_ttl.is_none());
    }
}
