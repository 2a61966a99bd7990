//! Secret generation and rotation configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Smallest accepted secret length in bytes.
pub const MIN_KEY_LENGTH: usize = 16;

/// Largest accepted secret length in bytes.
pub const MAX_KEY_LENGTH: usize = 512;

/// Configuration for per-role signing secrets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretsConfig {
    /// Lifetime of a secret when the role does not set its own.
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,

    /// Number of random bytes generated on rotation.
    #[serde(default = "default_key_length")]
    pub key_length: usize,

    /// Rotate a secret whose expiration has passed before signing with it.
    /// When unset, any stored secret is used as-is.
    #[serde(default)]
    pub rotate_expired: bool,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_ttl_secs(),
            key_length: default_key_length(),
            rotate_expired: false,
        }
    }
}

impl SecretsConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_KEY_LENGTH..=MAX_KEY_LENGTH).contains(&self.key_length) {
            return Err(ConfigError::Invalid(format!(
                "secrets.key_length must be between {} and {} bytes, got {}",
                MIN_KEY_LENGTH, MAX_KEY_LENGTH, self.key_length
            )));
        }
        if self.default_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "secrets.default_ttl_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn default_ttl_secs() -> u64 {
    86_400
}

fn default_key_length() -> usize {
    32
}
