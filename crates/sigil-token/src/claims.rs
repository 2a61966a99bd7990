//! Token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sigil_core::Claims;

/// Claims set by the issuer; same-named default or custom claims are dropped.
pub const RESERVED_CLAIMS: [&str; 3] = ["exp", "iat", "role_name"];

/// Compose the claim set for a token.
///
/// Starts from `defaults`; when `allow_custom` is set, `overrides` are laid on
/// top with the caller's value winning on conflict. Otherwise `overrides` are
/// ignored entirely. Neither input is modified.
pub fn compose_claims(defaults: &Claims, overrides: &Claims, allow_custom: bool) -> Claims {
    let mut claims = defaults.clone();
    if allow_custom {
        claims.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    claims
}

/// The signed payload of an issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Issuing role.
    pub role_name: String,

    /// Expiration (unix seconds).
    pub exp: i64,

    /// Issued at (unix seconds).
    pub iat: i64,

    /// Default and custom claims.
    #[serde(flatten)]
    pub claims: Claims,
}

impl TokenPayload {
    /// Build a payload for a token issued at `issued_at` living `ttl_secs`.
    pub fn new(
        role_name: impl Into<String>,
        mut claims: Claims,
        issued_at: DateTime<Utc>,
        ttl_secs: u64,
    ) -> Self {
        for reserved in RESERVED_CLAIMS {
            claims.remove(reserved);
        }

        let iat = issued_at.timestamp();
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        Self {
            role_name: role_name.into(),
            exp: iat.saturating_add(ttl),
            iat,
            claims,
        }
    }

    /// Expiration as a timestamp, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
