use std::time::Duration;

use async_trait::async_trait;
use printshop_models::UserId;
use thiserror::Error;

use crate::claims::TokenPurpose;

#[derive(Debug, Error)]
pub enum SecretStoreError {
    /// No live secret for the (user, purpose) pair: never issued, expired or deleted.
    #[error("secret not found")]
    NotFound,

    #[error("secret store unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),
}

/// TTL-capable key-value store holding one signing secret per (user, purpose).
///
/// Writing a secret replaces whatever was stored for the same pair.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn set_secret(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
        secret: &str,
        ttl: Duration,
    ) -> Result<(), SecretStoreError>;

    async fn get_secret(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
    ) -> Result<String, SecretStoreError>;

    async fn delete_secret(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
    ) -> Result<(), SecretStoreError>;
}
