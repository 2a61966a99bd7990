//! Token signing and verification.

use crate::claims::TokenPayload;
use crate::error::TokenError;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};
use sigil_core::SigningAlgorithm;

fn jwt_algorithm(algorithm: SigningAlgorithm) -> Algorithm {
    match algorithm {
        SigningAlgorithm::HS256 => Algorithm::HS256,
        SigningAlgorithm::HS384 => Algorithm::HS384,
        SigningAlgorithm::HS512 => Algorithm::HS512,
    }
}

/// Sign a payload with `key`, optionally stamping `kid` into the header.
pub fn sign(
    payload: &TokenPayload,
    key: &[u8],
    algorithm: SigningAlgorithm,
    kid: Option<&str>,
) -> Result<String, TokenError> {
    let mut header = Header::new(jwt_algorithm(algorithm));
    header.kid = kid.map(str::to_string);

    jsonwebtoken::encode(&header, payload, &EncodingKey::from_secret(key))
        .map_err(TokenError::SigningFailed)
}

/// Verify a token's signature and expiry and return its payload.
///
/// The header algorithm must equal `algorithm`; `exp` is required and checked
/// with `leeway_secs` of tolerance.
pub fn verify(
    token: &str,
    key: &[u8],
    algorithm: SigningAlgorithm,
    leeway_secs: u64,
) -> Result<TokenPayload, TokenError> {
    let mut validation = Validation::new(jwt_algorithm(algorithm));
    validation.leeway = leeway_secs;
    validation.validate_aud = false;

    let data = jsonwebtoken::decode::<TokenPayload>(token, &DecodingKey::from_secret(key), &validation)
        .map_err(TokenError::VerificationFailed)?;
    Ok(data.claims)
}

/// A structurally valid token whose signature has not been checked.
#[derive(Debug, Clone)]
pub struct UnverifiedToken {
    /// Header `alg`, as written.
    pub algorithm: String,
    /// Header `kid`, if any.
    pub kid: Option<String>,
    /// Raw payload claims.
    pub claims: Map<String, Value>,
}

impl UnverifiedToken {
    /// Require the `role_name` claim as a non-empty string.
    pub fn require_role_name(&self) -> Result<&str, TokenError> {
        self.claims
            .get("role_name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| TokenError::MissingClaim {
                claim: "role_name".to_string(),
            })
    }
}

/// Parse a token without verifying it.
pub fn inspect_token_unverified(token: &str) -> Result<UnverifiedToken, TokenError> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::ParseFailed(
            "token must have 3 parts separated by dots".to_string(),
        ));
    }

    let header = jsonwebtoken::decode_header(token.trim())
        .map_err(|e| TokenError::ParseFailed(format!("invalid header: {}", e)))?;

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| TokenError::ParseFailed(format!("failed to decode payload: {}", e)))?;
    let claims: Map<String, Value> = serde_json::from_slice(&payload_bytes)
        .map_err(|e| TokenError::ParseFailed(format!("failed to parse payload: {}", e)))?;

    Ok(UnverifiedToken {
        algorithm: format!("{:?}", header.alg),
        kid: header.kid,
        claims,
    })
}
