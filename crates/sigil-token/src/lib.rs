//! # sigil-token
//!
//! Token handling for Sigil.
//!
//! This crate provides functionality for:
//! - Generating random secret material for role secrets
//! - Composing a token's claim set from role defaults and caller overrides
//! - Signing claim sets as HMAC JWTs (HS256 / HS384 / HS512)
//! - Verifying signatures and expiry, and inspecting tokens unverified
//!
//! ## Token Layout
//!
//! | Claim | Source |
//! |-------|--------|
//! | `exp` | Issuance time + effective TTL (unix seconds) |
//! | `iat` | Issuance time (unix seconds) |
//! | `role_name` | Issuing role, used to resolve the role on validation |
//! | anything else | Role default claims, optionally overridden by the caller |
//!
//! Reserved claims always carry the issuer's values.

pub mod claims;
pub mod error;
pub mod keys;
pub mod token;

pub use claims::{RESERVED_CLAIMS, TokenPayload, compose_claims};
pub use error::TokenError;
pub use keys::generate_key_material;
pub use token::{UnverifiedToken, inspect_token_unverified, sign, verify};
