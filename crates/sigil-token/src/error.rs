//! Error types for the token crate.

use thiserror::Error;

/// Errors that can occur during token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Failed to sign a token.
    #[error("failed to sign token: {0}")]
    SigningFailed(#[source] jsonwebtoken::errors::Error),

    /// Token is not a well-formed JWT.
    #[error("failed to parse token: {0}")]
    ParseFailed(String),

    /// Signature, algorithm or expiry check failed.
    #[error("token verification failed: {0}")]
    VerificationFailed(#[source] jsonwebtoken::errors::Error),

    /// Token is missing a required claim.
    #[error("token missing required claim: {claim}")]
    MissingClaim { claim: String },
}
