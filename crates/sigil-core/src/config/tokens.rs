//! Token signing and validation configuration.

use crate::model::SigningAlgorithm;
use serde::{Deserialize, Serialize};

/// Configuration for issued tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokensConfig {
    /// Algorithm used for roles that are not bound to a named key.
    #[serde(default)]
    pub default_algorithm: SigningAlgorithm,

    /// Clock skew tolerated when checking `exp`, in seconds.
    #[serde(default)]
    pub leeway_secs: u64,
}
