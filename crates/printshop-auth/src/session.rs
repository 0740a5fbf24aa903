//! Session orchestration: register, login, validate, refresh and logout.

use std::{sync::Arc, time::Duration};

use printshop_config::{PasswordScheme, SecurityConfig};
use printshop_core::CredentialHasher;
use printshop_models::{
    NewUser, RegisterRequest, TokenPair, User, UserId, UserRole, UserStatus,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    claims::TokenPurpose,
    directory::{DirectoryError, UserDirectory},
    error::AuthError,
    identity::AuthenticatedIdentity,
    jwt::{TokenIssuer, TokenValidator},
    store::SecretStore,
};

pub struct SessionManager {
    directory: Arc<dyn UserDirectory>,
    store: Arc<dyn SecretStore>,
    issuer: TokenIssuer,
    validator: TokenValidator,
    hasher: CredentialHasher,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("hasher", &self.hasher)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        store: Arc<dyn SecretStore>,
        hasher: CredentialHasher,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            directory,
            issuer: TokenIssuer::new(store.clone()),
            validator: TokenValidator::new(store.clone()),
            store,
            hasher,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(
        directory: Arc<dyn UserDirectory>,
        store: Arc<dyn SecretStore>,
        config: &SecurityConfig,
    ) -> Self {
        let hasher = match config.password_scheme {
            PasswordScheme::Sha256 => CredentialHasher::salted_sha256(config.hash_salt.clone()),
            PasswordScheme::Bcrypt => CredentialHasher::bcrypt(config.bcrypt_cost),
        };

        Self::new(
            directory,
            store,
            hasher,
            config.access_token_ttl,
            config.refresh_token_ttl,
        )
    }

    pub fn directory(&self) -> &Arc<dyn UserDirectory> {
        &self.directory
    }

    pub fn hash_password(&self, plaintext: &str) -> Result<String, AuthError> {
        Ok(self.hasher.hash(plaintext)?)
    }

    /// Creates a customer account and returns the record as persisted.
    #[instrument(skip(self, candidate), fields(user.email = %candidate.email))]
    pub async fn register(&self, candidate: RegisterRequest) -> Result<User, AuthError> {
        if self.directory.get_by_email(&candidate.email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let id = UserId::new();
        self.directory
            .create(NewUser {
                id,
                first_name: candidate.first_name,
                last_name: candidate.last_name,
                email: candidate.email,
                password_hash: self.hasher.hash(&candidate.password)?,
                status: UserStatus::Active,
                role: UserRole::Customer,
            })
            .await?;

        let user = self.directory.get_by_id(id).await?.ok_or_else(|| {
            AuthError::Directory(DirectoryError::Unavailable(anyhow::anyhow!(
                "registered user {id} could not be read back"
            )))
        })?;

        info!(user.id = %user.id, "user registered");
        Ok(user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let Some(credentials) = self.directory.get_by_email(email).await? else {
            debug!("login rejected: unknown email");
            record_login("invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &credentials.password_hash) {
            debug!(user.id = %credentials.user.id, "login rejected: wrong password");
            record_login("invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        }

        if credentials.user.status == UserStatus::Blocked {
            warn!(user.id = %credentials.user.id, "login rejected: user is blocked");
            record_login("blocked");
            return Err(AuthError::UserIsBlocked);
        }

        let pair = self.issue_pair(credentials.user.id).await?;
        record_login("success");
        info!(user.id = %credentials.user.id, "user logged in");
        Ok(pair)
    }

    /// Validates an access token and resolves the caller's current role and status.
    ///
    /// A blocked user still validates; rejecting them is up to the caller.
    #[instrument(skip_all)]
    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedIdentity, AuthError> {
        let user_id = self.validator.verify(token, TokenPurpose::Access).await?;

        match self.directory.get_by_id(user_id).await? {
            Some(user) => Ok(user.into()),
            None => {
                debug!(user.id = %user_id, "token rejected: user no longer exists");
                Err(AuthError::InvalidToken)
            }
        }
    }

    /// Exchanges a refresh token for a new pair, rotating both secrets.
    ///
    /// Two concurrent calls with the same refresh token can both succeed;
    /// whichever writes last owns the live secrets.
    #[instrument(skip_all)]
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let user_id = match self.validator.verify(refresh_token, TokenPurpose::Refresh).await {
            Ok(user_id) => user_id,
            Err(e) => {
                metrics::counter!("auth_refresh_total", "outcome" => "rejected").increment(1);
                return Err(e);
            }
        };

        let pair = self.issue_pair(user_id).await?;
        metrics::counter!("auth_refresh_total", "outcome" => "success").increment(1);
        debug!(user.id = %user_id, "session rotated");
        Ok(pair)
    }

    /// Deletes both secrets, revoking every outstanding token for the user.
    #[instrument(skip(self))]
    pub async fn logout(&self, user_id: UserId) -> Result<(), AuthError> {
        for purpose in [TokenPurpose::Access, TokenPurpose::Refresh] {
            self.store
                .delete_secret(user_id, purpose)
                .await
                .map_err(AuthError::SecretStore)?;
        }

        info!(user.id = %user_id, "session revoked");
        Ok(())
    }

    /// Access secret is written before the refresh secret. If the second
    /// write fails the new access token stays valid and the old refresh
    /// token stays live.
    async fn issue_pair(&self, user_id: UserId) -> Result<TokenPair, AuthError> {
        let token = self
            .issuer
            .issue(user_id, TokenPurpose::Access, self.access_ttl)
            .await?;
        let refresh_token = self
            .issuer
            .issue(user_id, TokenPurpose::Refresh, self.refresh_ttl)
            .await?;

        Ok(TokenPair {
            token,
            refresh_token,
        })
    }
}

fn record_login(outcome: &'static str) {
    metrics::counter!("auth_login_attempts_total", "outcome" => outcome).increment(1);
}
