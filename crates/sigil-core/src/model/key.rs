//! Named signing-key configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Parameter name copied into the token header as `kid`.
pub const KID_PARAM: &str = "kid";

/// Signing algorithms understood by both the issuer and the validator.
///
/// Only symmetric HMAC algorithms are supported: each role owns exactly one
/// shared secret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SigningAlgorithm {
    #[default]
    HS256,
    HS384,
    HS512,
}

impl SigningAlgorithm {
    /// All supported algorithms.
    pub const ALL: [SigningAlgorithm; 3] = [Self::HS256, Self::HS384, Self::HS512];

    /// Canonical (upper-case) name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SigningAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unsupported signing algorithm '{}' (expected one of HS256, HS384, HS512)",
                    s
                )
            })
    }
}

/// Signing-key configuration referenced by roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    /// Key name (storage identity).
    pub name: String,

    /// Signing algorithm.
    pub algorithm: SigningAlgorithm,

    /// Algorithm-specific parameters.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl KeyEntry {
    /// Create a key entry without parameters.
    pub fn new(name: impl Into<String>, algorithm: SigningAlgorithm) -> Self {
        Self {
            name: name.into(),
            algorithm,
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Key identifier placed in token headers, if configured.
    pub fn kid(&self) -> Option<&str> {
        self.params.get(KID_PARAM).map(String::as_str)
    }
}
