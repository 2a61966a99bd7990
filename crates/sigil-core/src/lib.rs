//! # sigil-core
//!
//! Configuration and data model shared across all Sigil crates.
//!
//! - [`config`]: the `sigil.toml` configuration tree ([`SigilConfig`])
//! - [`model`]: persisted entries ([`RoleEntry`], [`KeyEntry`], [`SecretEntry`])

pub mod config;
pub mod error;
pub mod model;

pub use config::{
    AuthorizationConfig, LoggingConfig, SecretsConfig, ServerConfig, SigilConfig, StorageBackend,
    StorageConfig, TokensConfig,
};
pub use error::ConfigError;
pub use model::{Claims, KeyEntry, RoleEntry, SecretEntry, SigningAlgorithm};
