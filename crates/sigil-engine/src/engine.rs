//! The engine facade wiring stores, authorizer, issuer and validator.

use crate::admin::Admin;
use crate::authorizer::{Authorizer, Salt};
use crate::error::EngineError;
use crate::issuer::{IssuedToken, TokenIssuer};
use crate::key_store::KeyStore;
use crate::request::{TokenCreateRequest, TokenValidateRequest};
use crate::role_store::RoleStore;
use crate::secret_store::SecretStore;
use crate::validator::{TokenValidator, ValidationOutcome};
use sigil_core::SigilConfig;
use sigil_storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

/// Issues and validates role-bound tokens over a shared [`Storage`].
#[derive(Clone)]
pub struct Engine {
    roles: RoleStore,
    keys: KeyStore,
    authorizer: Authorizer,
    issuer: TokenIssuer,
    validator: TokenValidator,
    admin: Admin,
    require_role_id: bool,
}

impl Engine {
    /// Build an engine, loading (or creating) the authorization salt.
    pub async fn new(storage: Arc<dyn Storage>, config: &SigilConfig) -> Result<Self, EngineError> {
        let salt = Arc::new(Salt::load_or_create(storage.as_ref()).await?);
        let authorizer = Authorizer::new(salt);

        let roles = RoleStore::new(storage.clone());
        let keys = KeyStore::new(storage.clone());
        let secrets = SecretStore::new(storage, config.secrets.key_length);

        let issuer = TokenIssuer::new(
            secrets.clone(),
            config.tokens.default_algorithm,
            config.secrets.default_ttl_secs,
            config.secrets.rotate_expired,
        );
        let validator = TokenValidator::new(
            roles.clone(),
            keys.clone(),
            secrets.clone(),
            config.tokens.default_algorithm,
            config.tokens.leeway_secs,
        );
        let admin = Admin::new(
            roles.clone(),
            keys.clone(),
            secrets,
            authorizer.clone(),
            config.secrets.default_ttl_secs,
        );

        Ok(Self {
            roles,
            keys,
            authorizer,
            issuer,
            validator,
            admin,
            require_role_id: config.authorization.require_role_id,
        })
    }

    /// Issue a token for the request's role.
    pub async fn issue(&self, request: &TokenCreateRequest) -> Result<IssuedToken, EngineError> {
        let role = self.roles.get(&request.role_name).await?;

        match request.role_id.as_deref() {
            Some(role_id) => {
                if !self.authorizer.authorize(&role, role_id) {
                    warn!(role = %role.name, "Rejected role id");
                    return Err(EngineError::unauthorized(&role.name));
                }
            }
            None if self.require_role_id => {
                warn!(role = %role.name, "Rejected issuance without role id");
                return Err(EngineError::unauthorized(&role.name));
            }
            None => debug!(role = %role.name, "Issuing without role id"),
        }

        let key = self.keys.get_for_role(&role).await?;
        self.issuer.issue(request, &role, key.as_ref()).await
    }

    /// Validate a presented token.
    pub async fn validate(
        &self,
        request: &TokenValidateRequest,
    ) -> Result<ValidationOutcome, EngineError> {
        self.validator.validate(request).await
    }

    /// Role and key administration.
    pub fn admin(&self) -> &Admin {
        &self.admin
    }
}
