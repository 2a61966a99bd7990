//! Typed request inputs.
//!
//! Requests are decoded from JSON field maps at the boundary. Unknown or
//! mistyped fields are rejected with [`EngineError::Decode`] rather than being
//! dropped or defaulted.

use crate::error::EngineError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use sigil_core::Claims;

/// Token kinds this engine can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// HMAC-signed JWT.
    Jwt,
}

impl TokenKind {
    /// Parse a caller-supplied token type, case-insensitively. An absent or
    /// blank type means [`TokenKind::Jwt`].
    pub fn parse(raw: Option<&str>) -> Result<Self, EngineError> {
        let normalized = raw.map(|s| s.trim().to_ascii_lowercase()).unwrap_or_default();
        match normalized.as_str() {
            "" | "jwt" => Ok(Self::Jwt),
            _ => Err(EngineError::UnsupportedTokenType(normalized)),
        }
    }
}

/// Request to issue a token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenCreateRequest {
    /// Role to issue for.
    pub role_name: String,

    /// Caller-facing role id, checked against the role's authorization hash.
    #[serde(default)]
    pub role_id: Option<String>,

    /// Claim overrides, honoured only if the role allows custom claims.
    #[serde(default)]
    pub claims: Claims,

    /// Requested lifetime in seconds; 0 uses the role default.
    #[serde(default, alias = "token_ttl")]
    pub ttl: u64,

    /// Requested token type; defaults to `jwt`.
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenCreateRequest {
    /// Create a request for `role_name` with no overrides.
    pub fn new(role_name: impl Into<String>) -> Self {
        Self {
            role_name: role_name.into(),
            ..Self::default()
        }
    }

    pub fn with_role_id(mut self, role_id: impl Into<String>) -> Self {
        self.role_id = Some(role_id.into());
        self
    }

    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.insert(name.into(), value.into());
        self
    }

    pub fn with_ttl(mut self, ttl: u64) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    /// Decode from a JSON field map.
    pub fn decode(fields: serde_json::Value) -> Result<Self, EngineError> {
        let mut request: Self = decode_fields(fields)?;
        if request.role_name.trim().is_empty() {
            return Err(EngineError::Decode("role_name must not be empty".into()));
        }
        if request.role_id.as_deref().is_some_and(str::is_empty) {
            request.role_id = None;
        }
        Ok(request)
    }
}

/// Request to validate a token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenValidateRequest {
    /// The token as issued.
    pub token: String,

    /// Role to validate against; defaults to the token's `role_name` claim.
    #[serde(default)]
    pub role_name: Option<String>,
}

impl TokenValidateRequest {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            role_name: None,
        }
    }

    pub fn with_role_name(mut self, role_name: impl Into<String>) -> Self {
        self.role_name = Some(role_name.into());
        self
    }

    /// Decode from a JSON field map.
    pub fn decode(fields: serde_json::Value) -> Result<Self, EngineError> {
        let mut request: Self = decode_fields(fields)?;
        if request.role_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            request.role_name = None;
        }
        Ok(request)
    }
}

fn decode_fields<T: DeserializeOwned>(fields: serde_json::Value) -> Result<T, EngineError> {
    serde_json::from_value(fields).map_err(|e| EngineError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_kind_is_case_insensitive() {
        assert_eq!(TokenKind::parse(Some("JWT")).unwrap(), TokenKind::Jwt);
        assert_eq!(TokenKind::parse(Some(" jwt ")).unwrap(), TokenKind::Jwt);
        assert_eq!(TokenKind::parse(None).unwrap(), TokenKind::Jwt);
    }

    #[test]
    fn test_unknown_token_kind() {
        let err = TokenKind::parse(Some("JWS")).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedTokenType(t) if t == "jws"));
    }

    #[test]
    fn test_decode_full_request() {
        let request = TokenCreateRequest::decode(json!({
            "role_name": "billing",
            "role_id": "abc",
            "claims": {"scope": "write"},
            "ttl": 7200,
            "token_type": "jwt"
        }))
        .unwrap();

        assert_eq!(request.role_name, "billing");
        assert_eq!(request.role_id.as_deref(), Some("abc"));
        assert_eq!(request.claims["scope"], "write");
        assert_eq!(request.ttl, 7200);
    }

    #[test]
    fn test_decode_token_ttl_alias_and_defaults() {
        let request = TokenCreateRequest::decode(json!({
            "role_name": "billing",
            "token_ttl": 30,
            "role_id": ""
        }))
        .unwrap();
        assert_eq!(request.ttl, 30);
        assert!(request.role_id.is_none());
        assert!(request.claims.is_empty());
        assert!(request.token_type.is_none());
    }

    #[test]
    fn test_decode_rejects_bad_fields() {
        let cases = [
            json!({"role_name": "billing", "surprise": 1}),
            json!({"role_name": "billing", "ttl": -5}),
            json!({"role_name": "billing", "ttl": "600"}),
            json!({"role_name": "billing", "claims": {"n": 5}}),
            json!({"role_name": ""}),
            json!({}),
            json!("billing"),
        ];
        for fields in cases {
            let err = TokenCreateRequest::decode(fields.clone()).unwrap_err();
            assert!(matches!(err, EngineError::Decode(_)), "accepted {fields}");
        }
    }

    #[test]
    fn test_decode_validate_request() {
        let request = TokenValidateRequest::decode(json!({"token": "a.b.c", "role_name": ""})).unwrap();
        assert_eq!(request.token, "a.b.c");
        assert!(request.role_name.is_none());

        let err = TokenValidateRequest::decode(json!({"role_name": "billing"})).unwrap_err();
        assert!(matches!(err, EngineError::Decode(_)));
    }
}
