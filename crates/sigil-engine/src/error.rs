//! Error types for the issuance engine.
//!
//! Every variant is terminal for the request that produced it; nothing is
//! retried internally. A token that fails verification is *not* an error: it
//! is reported as `is_valid: false` by the validator.

use sigil_storage::StorageError;
use sigil_token::TokenError;
use thiserror::Error;

/// Errors surfaced by issuance, validation and administration.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No role with this name exists.
    #[error("role '{name}' not recognised")]
    RoleNotFound { name: String },

    /// A role names a key that does not exist.
    #[error("key '{key}' not recognised")]
    KeyNotFound { key: String },

    /// The caller's role id does not match the role's authorization hash.
    #[error("unauthorized access to role '{role}'")]
    Unauthorized { role: String },

    /// The request payload is malformed.
    #[error("failed to decode request: {0}")]
    Decode(String),

    /// The requested token type is not implemented.
    #[error("unsupported token type '{0}'")]
    UnsupportedTokenType(String),

    /// Signing the token failed.
    #[error("failed to sign token for role '{role}': {source}")]
    SigningFailure {
        role: String,
        #[source]
        source: TokenError,
    },

    /// The presented token could not be parsed.
    #[error("unable to parse token: {0}")]
    TokenParseFailure(#[source] TokenError),

    /// The role's secret could not be read or rotated.
    #[error("secret for role '{role}' unavailable: {source}")]
    SecretUnavailable {
        role: String,
        #[source]
        source: StorageError,
    },

    /// The stored authorization salt is unusable.
    #[error("invalid authorization salt: {0}")]
    InvalidSalt(String),

    /// A role definition violates its invariants.
    #[error("invalid role '{name}': {reason}")]
    InvalidRole { name: String, reason: String },

    /// A key definition is not acceptable.
    #[error("invalid key '{name}': {reason}")]
    InvalidKey { name: String, reason: String },

    /// A role with this name already exists.
    #[error("role '{0}' already exists")]
    RoleExists(String),

    /// A key cannot be deleted while roles reference it.
    #[error("key '{key}' is still referenced by roles: {names}", names = .roles.join(", "))]
    KeyInUse { key: String, roles: Vec<String> },

    /// Role, key or salt storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl EngineError {
    pub(crate) fn role_not_found(name: &str) -> Self {
        Self::RoleNotFound {
            name: name.to_string(),
        }
    }

    pub(crate) fn key_not_found(key: &str) -> Self {
        Self::KeyNotFound {
            key: key.to_string(),
        }
    }

    pub(crate) fn unauthorized(role: &str) -> Self {
        Self::Unauthorized {
            role: role.to_string(),
        }
    }

    pub(crate) fn secret_unavailable(role: &str, source: StorageError) -> Self {
        Self::SecretUnavailable {
            role: role.to_string(),
            source,
        }
    }
}
