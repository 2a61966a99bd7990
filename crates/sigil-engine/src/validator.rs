//! Token validation.

use crate::error::EngineError;
use crate::key_store::KeyStore;
use crate::request::TokenValidateRequest;
use crate::role_store::RoleStore;
use crate::secret_store::SecretStore;
use serde::Serialize;
use sigil_core::SigningAlgorithm;
use sigil_token::{inspect_token_unverified, verify};
use tracing::debug;

/// Result of a validation that reached a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub is_valid: bool,
}

impl ValidationOutcome {
    fn invalid() -> Self {
        Self { is_valid: false }
    }
}

/// Checks presented tokens against their role's current secret.
///
/// Validation only ever reads secrets; it never creates or rotates them.
#[derive(Clone)]
pub struct TokenValidator {
    roles: RoleStore,
    keys: KeyStore,
    secrets: SecretStore,
    default_algorithm: SigningAlgorithm,
    leeway_secs: u64,
}

impl TokenValidator {
    pub fn new(
        roles: RoleStore,
        keys: KeyStore,
        secrets: SecretStore,
        default_algorithm: SigningAlgorithm,
        leeway_secs: u64,
    ) -> Self {
        Self {
            roles,
            keys,
            secrets,
            default_algorithm,
            leeway_secs,
        }
    }

    /// Validate a token.
    ///
    /// Unparseable tokens and unknown roles or keys are errors. A bad
    /// signature, an algorithm mismatch, an expired token or a role with no
    /// secret yields `is_valid: false`.
    pub async fn validate(
        &self,
        request: &TokenValidateRequest,
    ) -> Result<ValidationOutcome, EngineError> {
        let unverified =
            inspect_token_unverified(&request.token).map_err(EngineError::TokenParseFailure)?;
        let role_name = match request.role_name.as_deref() {
            Some(hint) => hint,
            None => unverified
                .require_role_name()
                .map_err(EngineError::TokenParseFailure)?,
        };

        let role = self.roles.get(role_name).await?;
        let key = self.keys.get_for_role(&role).await?;

        let secret = self
            .secrets
            .read(&role.id, &role.secret_id)
            .await
            .map_err(|e| EngineError::secret_unavailable(&role.name, e))?;
        let Some(secret) = secret else {
            debug!(role = %role.name, "No secret for role; token rejected");
            return Ok(ValidationOutcome::invalid());
        };

        let algorithm = key.map_or(self.default_algorithm, |k| k.algorithm);
        match verify(&request.token, &secret.key, algorithm, self.leeway_secs) {
            Ok(_) => Ok(ValidationOutcome { is_valid: true }),
            Err(e) => {
                debug!(role = %role.name, error = %e, "Token failed verification");
                Ok(ValidationOutcome::invalid())
            }
        }
    }
}
