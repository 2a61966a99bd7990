//! Persisted entries.
//!
//! Roles and keys are written by the administrative path and are read-only to
//! issuance and validation. Secrets are written by role creation and by lazy
//! rotation during issuance.

pub mod key;
pub mod role;
pub mod secret;

use std::collections::BTreeMap;

pub use key::{KeyEntry, SigningAlgorithm};
pub use role::RoleEntry;
pub use secret::SecretEntry;

/// A flat string-to-string claim mapping.
pub type Claims = BTreeMap<String, String>;
