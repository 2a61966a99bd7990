//! # sigil-engine
//!
//! Role-bound token issuance and validation.
//!
//! A *role* fixes the claims, lifetime bounds and signing key of the tokens
//! issued for it. Each role owns one rotating secret; tokens are HMAC JWTs
//! signed with that secret. Callers prove access to a role by presenting its
//! role id, which is checked against a salted keyed hash.
//!
//! ## Issuance
//!
//! ```text
//! request -> role store -> authorizer -> key store -> issuer -> token
//!                                                       |
//!                                                 secret store (read, rotate)
//! ```
//!
//! ## Validation
//!
//! ```text
//! token -> role store -> key store -> secret store (read only) -> verify
//! ```
//!
//! Roles and keys are written only through [`Admin`].

pub mod admin;
pub mod authorizer;
pub mod engine;
pub mod error;
pub mod issuer;
pub mod key_store;
mod paths;
pub mod request;
pub mod role_store;
pub mod secret_store;
pub mod validator;

pub use admin::{Admin, CreatedRole, RoleDefinition};
pub use authorizer::{Authorizer, Salt};
pub use engine::Engine;
pub use error::EngineError;
pub use issuer::{IssuedToken, TokenIssuer, effective_ttl};
pub use key_store::KeyStore;
pub use request::{TokenCreateRequest, TokenKind, TokenValidateRequest};
pub use role_store::RoleStore;
pub use secret_store::SecretStore;
pub use validator::{TokenValidator, ValidationOutcome};
