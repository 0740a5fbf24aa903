//! Token issuance and validation against per-user rotating secrets.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
};
use printshop_models::UserId;
use rand::{Rng, distributions::Alphanumeric, rngs::OsRng};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    claims::{Claims, TokenPurpose},
    error::AuthError,
    store::{SecretStore, SecretStoreError},
};

const SECRET_LEN: usize = 32;

/// Only the HMAC family is accepted. Anything else in the header is rejected
/// before a key is even looked up.
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// A fresh alphanumeric signing secret drawn from the operating system CSPRNG.
pub fn generate_secret() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(SECRET_LEN)
        .map(char::from)
        .collect()
}

#[derive(Clone)]
pub struct TokenIssuer {
    store: Arc<dyn SecretStore>,
}

impl TokenIssuer {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Stores a brand-new secret for `(user_id, purpose)` and signs a token with it.
    ///
    /// Every token previously issued for the same pair stops verifying as soon
    /// as the new secret is written.
    #[instrument(skip(self), fields(user.id = %user_id, token.purpose = %purpose))]
    pub async fn issue(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let secret = generate_secret();

        self.store
            .set_secret(user_id, purpose, &secret, ttl)
            .await
            .map_err(AuthError::SecretStore)?;

        let claims = Claims::new(user_id, ttl);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(AuthError::Signing)?;

        metrics::counter!("auth_tokens_issued_total", "purpose" => purpose.as_str()).increment(1);
        debug!(exp = claims.exp, "token issued");

        Ok(token)
    }
}

#[derive(Clone)]
pub struct TokenValidator {
    store: Arc<dyn SecretStore>,
}

#[derive(Deserialize)]
struct UnverifiedIssuer {
    iss: Option<String>,
}

impl TokenValidator {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Verifies a token against the secret currently stored for its claimed
    /// issuer and returns that issuer.
    ///
    /// Every failure short of a store outage is reported as
    /// [`AuthError::InvalidToken`].
    #[instrument(skip_all, fields(token.purpose = %purpose))]
    pub async fn verify(&self, token: &str, purpose: TokenPurpose) -> Result<UserId, AuthError> {
        let header = decode_header(token).map_err(|e| reject("unparseable header", e))?;
        if !HMAC_ALGORITHMS.contains(&header.alg) {
            debug!(alg = ?header.alg, "token rejected: non-HMAC algorithm");
            return Err(AuthError::InvalidToken);
        }

        let user_id = unverified_issuer(token)?;

        let secret = match self.store.get_secret(user_id, purpose).await {
            Ok(secret) => secret,
            Err(SecretStoreError::NotFound) => {
                debug!(user.id = %user_id, "token rejected: no live secret");
                return Err(AuthError::InvalidToken);
            }
            Err(e) => return Err(AuthError::SecretStore(e)),
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss"]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(|e| reject("signature or expiry check failed", e))?;

        // jsonwebtoken only rejects `exp < now`; a token is dead from its `exp` second on.
        let now = Utc::now().timestamp().max(0) as u64;
        if data.claims.exp <= now {
            debug!(user.id = %user_id, exp = data.claims.exp, "token rejected: expired");
            return Err(AuthError::InvalidToken);
        }

        Ok(user_id)
    }
}

/// Reads `iss` without checking the signature. The value is only used to
/// pick which secret to verify against.
fn unverified_issuer(token: &str) -> Result<UserId, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<UnverifiedIssuer>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| reject("unparseable claims", e))?;

    let iss = data.claims.iss.ok_or_else(|| {
        debug!("token rejected: missing iss claim");
        AuthError::InvalidToken
    })?;

    iss.parse().map_err(|_| {
        debug!("token rejected: iss is not a user id");
        AuthError::InvalidToken
    })
}

fn reject(reason: &'static str, err: jsonwebtoken::errors::Error) -> AuthError {
    debug!(error = %err, "token rejected: {reason}");
    AuthError::InvalidToken
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySecretStore;

    const TTL: Duration = Duration::from_secs(900);

    fn setup() -> (Arc<MemorySecretStore>, TokenIssuer, TokenValidator) {
        let store = Arc::new(MemorySecretStore::new());
        let issuer = TokenIssuer::new(store.clone());
        let validator = TokenValidator::new(store.clone());
        (store, issuer, validator)
    }

    fn sign(claims: &Claims, alg: Algorithm, secret: &str) -> String {
        encode(
            &Header::new(alg),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn replace_header(token: &str, encoded_header: &str) -> String {
        let (_, rest) = token.split_once('.').unwrap();
        format!("{}.{}", encoded_header, rest)
    }

    #[test]
    fn test_generate_secret() {
        let a = generate_secret();
        let b = generate_secret();

        assert_eq!(a.len(), SECRET_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_issue_then_verify() {
        let (_, issuer, validator) = setup();
        let user_id = UserId::new();

        let token = issuer.issue(user_id, TokenPurpose::Access, TTL).await.unwrap();
        let verified = validator.verify(&token, TokenPurpose::Access).await.unwrap();

        assert_eq!(verified, user_id);
    }

    #[tokio::test]
    async fn test_issue_persists_secret_for_purpose() {
        let (store, issuer, _) = setup();
        let user_id = UserId::new();

        issuer.issue(user_id, TokenPurpose::Refresh, TTL).await.unwrap();

        assert!(store.current(user_id, TokenPurpose::Refresh).await.is_some());
        assert!(store.current(user_id, TokenPurpose::Access).await.is_none());
    }

    #[tokio::test]
    async fn test_access_token_is_not_a_refresh_token() {
        let (_, issuer, validator) = setup();
        let user_id = UserId::new();

        let access = issuer.issue(user_id, TokenPurpose::Access, TTL).await.unwrap();
        issuer.issue(user_id, TokenPurpose::Refresh, TTL).await.unwrap();

        let result = validator.verify(&access, TokenPurpose::Refresh).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_reissue_revokes_previous_token() {
        let (_, issuer, validator) = setup();
        let user_id = UserId::new();

        let old = issuer.issue(user_id, TokenPurpose::Access, TTL).await.unwrap();
        let new = issuer.issue(user_id, TokenPurpose::Access, TTL).await.unwrap();

        assert!(matches!(
            validator.verify(&old, TokenPurpose::Access).await,
            Err(AuthError::InvalidToken)
        ));
        assert!(validator.verify(&new, TokenPurpose::Access).await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_token_rejected_with_live_secret() {
        let (store, _, validator) = setup();
        let user_id = UserId::new();
        store
            .set_secret(user_id, TokenPurpose::Access, "known-secret", TTL)
            .await
            .unwrap();

        let claims = Claims {
            iss: user_id.to_string(),
            exp: (Utc::now().timestamp() - 10) as u64,
        };
        let token = sign(&claims, Algorithm::HS256, "known-secret");

        let result = validator.verify(&token, TokenPurpose::Access).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_token_rejected_in_its_expiry_second() {
        let (store, _, validator) = setup();
        let user_id = UserId::new();
        store
            .set_secret(user_id, TokenPurpose::Access, "known-secret", TTL)
            .await
            .unwrap();

        for _ in 0..20 {
            let claims = Claims {
                iss: user_id.to_string(),
                exp: Utc::now().timestamp() as u64,
            };
            let token = sign(&claims, Algorithm::HS256, "known-secret");

            let result = validator.verify(&token, TokenPurpose::Access).await;
            assert!(matches!(result, Err(AuthError::InvalidToken)));
        }
    }

    #[tokio::test]
    async fn test_store_read_failure_is_not_an_invalid_token() {
        let (store, issuer, validator) = setup();
        let user_id = UserId::new();
        let token = issuer.issue(user_id, TokenPurpose::Access, TTL).await.unwrap();

        store.fail_reads(TokenPurpose::Access).await;

        let result = validator.verify(&token, TokenPurpose::Access).await;
        assert!(matches!(result, Err(AuthError::SecretStore(_))));
    }

    #[tokio::test]
    async fn test_tampered_signature_rejected() {
        let (_, issuer, validator) = setup();
        let user_id = UserId::new();
        let token = issuer.issue(user_id, TokenPurpose::Access, TTL).await.unwrap();

        let (message, signature) = token.rsplit_once('.').unwrap();
        let mut chars: Vec<char> = signature.chars().collect();
        chars[5] = if chars[5] == 'A' { 'B' } else { 'A' };
        let tampered = format!("{}.{}", message, chars.into_iter().collect::<String>());

        let result = validator.verify(&tampered, TokenPurpose::Access).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_unknown_secret_rejected() {
        let (store, _, validator) = setup();
        let user_id = UserId::new();
        store
            .set_secret(user_id, TokenPurpose::Access, "the-real-secret", TTL)
            .await
            .unwrap();

        let forged = sign(&Claims::new(user_id, TTL), Algorithm::HS256, "attacker-secret");

        let result = validator.verify(&forged, TokenPurpose::Access).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_missing_secret_is_invalid_token() {
        let (_, _, validator) = setup();
        let token = sign(&Claims::new(UserId::new(), TTL), Algorithm::HS256, "whatever");

        let result = validator.verify(&token, TokenPurpose::Access).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_non_hmac_algorithm_rejected() {
        let (_, issuer, validator) = setup();
        let token = issuer
            .issue(UserId::new(), TokenPurpose::Access, TTL)
            .await
            .unwrap();

        // {"alg":"RS256","typ":"JWT"}
        let rs256 = replace_header(&token, "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9");
        // {"alg":"none","typ":"JWT"}
        let none = replace_header(&token, "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0");

        for forged in [rs256, none] {
            let result = validator.verify(&forged, TokenPurpose::Access).await;
            assert!(matches!(result, Err(AuthError::InvalidToken)));
        }
    }

    #[tokio::test]
    async fn test_other_hmac_variant_accepted() {
        let (store, _, validator) = setup();
        let user_id = UserId::new();
        store
            .set_secret(user_id, TokenPurpose::Access, "known-secret", TTL)
            .await
            .unwrap();

        let token = sign(&Claims::new(user_id, TTL), Algorithm::HS512, "known-secret");

        assert_eq!(
            validator.verify(&token, TokenPurpose::Access).await.unwrap(),
            user_id
        );
    }

    #[tokio::test]
    async fn test_malformed_tokens_rejected() {
        let (_, _, validator) = setup();

        for token in ["", "invalid-token", "a.b.c", "a.b"] {
            let result = validator.verify(token, TokenPurpose::Access).await;
            assert!(matches!(result, Err(AuthError::InvalidToken)), "{token}");
        }
    }

    #[tokio::test]
    async fn test_non_uuid_issuer_rejected() {
        let (_, _, validator) = setup();
        let claims = Claims {
            iss: "admin".to_string(),
            exp: Claims::new(UserId::new(), TTL).exp,
        };
        let token = sign(&claims, Algorithm::HS256, "secret");

        let result = validator.verify(&token, TokenPurpose::Access).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_store_outage_is_not_invalid_token() {
        let (store, issuer, _) = setup();
        store.fail_writes(TokenPurpose::Access).await;

        let result = issuer.issue(UserId::new(), TokenPurpose::Access, TTL).await;
        assert!(matches!(result, Err(AuthError::SecretStore(_))));
    }
}
