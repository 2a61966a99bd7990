//! Configuration types for Sigil.
//!
//! Configuration is read from a single TOML file (`sigil.toml` by default).
//! Every section and every field has a default, so an empty file, or no file
//! at all, yields a working in-memory setup.
//!
//! # Resolution order
//!
//! 1. An explicit path (e.g. the CLI `--config` flag); it must exist.
//! 2. The `SIGIL_CONFIG` environment variable; it must exist.
//! 3. `sigil.toml` in the working directory; defaults are used when absent.

pub mod secrets;
pub mod server;
pub mod storage;
pub mod tokens;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use secrets::SecretsConfig;
pub use server::ServerConfig;
pub use storage::{StorageBackend, StorageConfig};
pub use tokens::TokensConfig;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "SIGIL_CONFIG";

/// Configuration file used when nothing else is specified.
pub const DEFAULT_CONFIG_FILE: &str = "sigil.toml";

/// Complete Sigil configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SigilConfig {
    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Secret material generation and rotation.
    #[serde(default)]
    pub secrets: SecretsConfig,

    /// Token signing and validation.
    #[serde(default)]
    pub tokens: TokensConfig,

    /// Role-id authorization policy.
    #[serde(default)]
    pub authorization: AuthorizationConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Policy for the keyed-hash role-id check on issuance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorizationConfig {
    /// When set, issuance without a `role_id` is rejected as unauthorized.
    /// A supplied `role_id` is always checked regardless of this flag.
    #[serde(default)]
    pub require_role_id: bool,
}

/// Logging configuration for the binaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

impl SigilConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: SigilConfig = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw, path)
    }

    /// Load configuration following the documented resolution order.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load_file(Path::new(&path));
        }

        let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::load_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.secrets.validate()?;
        if self.server.bind.trim().is_empty() {
            return Err(ConfigError::Invalid("server.bind must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SigningAlgorithm;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SigilConfig::from_toml("", Path::new("inline")).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.secrets.default_ttl_secs, 86_400);
        assert_eq!(config.secrets.key_length, 32);
        assert!(!config.secrets.rotate_expired);
        assert_eq!(config.tokens.default_algorithm, SigningAlgorithm::HS256);
        assert!(!config.authorization.require_role_id);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_full_config() {
        let raw = r#"
            [storage]
            backend = "file"
            path = "/var/lib/sigil"

            [secrets]
            default_ttl_secs = 3600
            key_length = 64
            rotate_expired = true

            [tokens]
            default_algorithm = "HS512"
            leeway_secs = 5

            [authorization]
            require_role_id = true

            [server]
            bind = "0.0.0.0:9000"
        "#;

        let config = SigilConfig::from_toml(raw, Path::new("inline")).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.path, PathBuf::from("/var/lib/sigil"));
        assert_eq!(config.secrets.key_length, 64);
        assert!(config.secrets.rotate_expired);
        assert_eq!(config.tokens.default_algorithm, SigningAlgorithm::HS512);
        assert_eq!(config.tokens.leeway_secs, 5);
        assert!(config.authorization.require_role_id);
        assert_eq!(config.server.bind, "0.0.0.0:9000");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SigilConfig::from_toml("[storage]\nbackend = \"memory\"\ncolour = 1\n", Path::new("inline"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_short_key_length_rejected() {
        let err = SigilConfig::from_toml("[secrets]\nkey_length = 4\n", Path::new("inline")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nfilter = \"sigil=debug\"").unwrap();

        let config = SigilConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.logging.filter, "sigil=debug");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let err = SigilConfig::load(Some(Path::new("/nonexistent/sigil.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
