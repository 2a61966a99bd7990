//! Token issuance.

use crate::error::EngineError;
use crate::request::{TokenCreateRequest, TokenKind};
use crate::secret_store::SecretStore;
use chrono::{DateTime, Utc};
use sigil_core::{KeyEntry, RoleEntry, SecretEntry, SigningAlgorithm};
use sigil_token::{TokenPayload, compose_claims, sign};
use tracing::debug;

/// Lifetime to grant: 0 means the role default, and anything above the
/// role's ceiling is clamped to it.
pub fn effective_ttl(requested: u64, role: &RoleEntry) -> u64 {
    if requested == 0 {
        role.default_ttl
    } else if requested > role.max_ttl {
        role.max_ttl
    } else {
        requested
    }
}

/// A freshly signed token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Effective lifetime in seconds.
    pub ttl: u64,
    /// The exact claim set that was signed.
    pub payload: TokenPayload,
}

impl IssuedToken {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.payload.expires_at()
    }
}

/// Mints tokens for already-authorized requests.
#[derive(Clone)]
pub struct TokenIssuer {
    secrets: SecretStore,
    default_algorithm: SigningAlgorithm,
    default_secret_ttl: u64,
    rotate_expired: bool,
}

impl TokenIssuer {
    pub fn new(
        secrets: SecretStore,
        default_algorithm: SigningAlgorithm,
        default_secret_ttl: u64,
        rotate_expired: bool,
    ) -> Self {
        Self {
            secrets,
            default_algorithm,
            default_secret_ttl,
            rotate_expired,
        }
    }

    /// Issue a token for `role`, signed with the algorithm of `key` (or the
    /// default algorithm when the role names no key).
    pub async fn issue(
        &self,
        request: &TokenCreateRequest,
        role: &RoleEntry,
        key: Option<&KeyEntry>,
    ) -> Result<IssuedToken, EngineError> {
        match TokenKind::parse(request.token_type.as_deref())? {
            TokenKind::Jwt => self.issue_jwt(request, role, key).await,
        }
    }

    async fn issue_jwt(
        &self,
        request: &TokenCreateRequest,
        role: &RoleEntry,
        key: Option<&KeyEntry>,
    ) -> Result<IssuedToken, EngineError> {
        let ttl = effective_ttl(request.ttl, role);
        if request.ttl > role.max_ttl {
            debug!(
                role = %role.name,
                requested = request.ttl,
                max_ttl = role.max_ttl,
                "Clamped requested TTL"
            );
        }

        let claims = compose_claims(
            &role.default_claims,
            &request.claims,
            role.allow_custom_claims,
        );
        let payload = TokenPayload::new(role.name.clone(), claims, Utc::now(), ttl);

        let secret = self.acquire_secret(role).await?;
        let algorithm = key.map_or(self.default_algorithm, |k| k.algorithm);
        let token = sign(&payload, &secret.key, algorithm, key.and_then(KeyEntry::kid)).map_err(
            |source| EngineError::SigningFailure {
                role: role.name.clone(),
                source,
            },
        )?;

        debug!(role = %role.name, ttl, %algorithm, "Issued token");
        Ok(IssuedToken {
            token,
            ttl,
            payload,
        })
    }

    async fn acquire_secret(&self, role: &RoleEntry) -> Result<SecretEntry, EngineError> {
        let existing = self
            .secrets
            .read(&role.id, &role.secret_id)
            .await
            .map_err(|e| EngineError::secret_unavailable(&role.name, e))?;

        match existing {
            Some(secret) if !(self.rotate_expired && secret.is_expired_at(Utc::now())) => {
                Ok(secret)
            }
            existing => {
                debug!(
                    role = %role.name,
                    expired = existing.is_some(),
                    "Rotating role secret"
                );
                let ttl = role.secret_ttl.unwrap_or(self.default_secret_ttl);
                self.secrets
                    .rotate(&role.id, &role.secret_id, ttl)
                    .await
                    .map_err(|e| EngineError::secret_unavailable(&role.name, e))
            }
        }
    }
}
