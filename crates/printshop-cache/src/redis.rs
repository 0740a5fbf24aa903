//! Redis implementation of the secret store.

use std::time::Duration;

use async_trait::async_trait;
use printshop_auth::{SecretStore, SecretStoreError, TokenPurpose};
use printshop_models::UserId;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, instrument};

use crate::{config::CacheConfig, keys::secret_key};

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),
}

/// Secret store backed by Redis `SET EX` / `GET` / `DEL`.
///
/// Expiry is delegated to Redis, so a secret disappears on its own once the
/// token signed with it can no longer be valid.
#[derive(Clone)]
pub struct RedisSecretStore {
    conn: ConnectionManager,
    namespace: String,
}

impl std::fmt::Debug for RedisSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSecretStore")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl RedisSecretStore {
    /// Opens a managed connection that reconnects on its own after failures.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if the URL is invalid or the first
    /// connection attempt fails.
    pub async fn connect(config: &CacheConfig) -> Result<Self, CacheError> {
        let client = Client::open(config.redis_url.as_str())?;
        let conn = ConnectionManager::new(client).await?;

        info!(namespace = %config.key_prefix, "Connected to Redis secret store");

        Ok(Self {
            conn,
            namespace: config.key_prefix.clone(),
        })
    }

    fn key(&self, user_id: UserId, purpose: TokenPurpose) -> String {
        secret_key(&self.namespace, purpose, user_id)
    }
}

fn unavailable(key: &str, err: redis::RedisError) -> SecretStoreError {
    error!(cache.key = %key, error = %err, "Redis secret store error");
    SecretStoreError::Unavailable(err.into())
}

#[async_trait]
impl SecretStore for RedisSecretStore {
    #[instrument(skip(self, secret), fields(cache.operation = "SETEX"))]
    async fn set_secret(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
        secret: &str,
        ttl: Duration,
    ) -> Result<(), SecretStoreError> {
        let key = self.key(user_id, purpose);
        let mut conn = self.conn.clone();
        // SETEX rejects a zero expiry.
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(&key, secret, ttl_secs)
            .await
            .map_err(|e| unavailable(&key, e))?;

        debug!(cache.key = %key, cache.ttl_secs = %ttl_secs, "Secret stored");
        Ok(())
    }

    #[instrument(skip(self), fields(cache.operation = "GET"))]
    async fn get_secret(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
    ) -> Result<String, SecretStoreError> {
        let key = self.key(user_id, purpose);
        let mut conn = self.conn.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(secret)) => Ok(secret),
            Ok(None) => {
                debug!(cache.key = %key, "Secret missing");
                Err(SecretStoreError::NotFound)
            }
            Err(e) => Err(unavailable(&key, e)),
        }
    }

    #[instrument(skip(self), fields(cache.operation = "DEL"))]
    async fn delete_secret(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
    ) -> Result<(), SecretStoreError> {
        let key = self.key(user_id, purpose);
        let mut conn = self.conn.clone();

        conn.del::<_, ()>(&key)
            .await
            .map_err(|e| unavailable(&key, e))?;

        debug!(cache.key = %key, "Secret deleted");
        Ok(())
    }
}
