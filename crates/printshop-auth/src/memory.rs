//! In-memory adapters for the secret store and user directory.
//!
//! Only compiled for tests and with the `test-utils` feature.

use std::{
    collections::{HashMap, HashSet},
    time::{Duration, Instant},
};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use printshop_models::{NewUser, User, UserChanges, UserCredentials, UserId};
use tokio::sync::Mutex;

use crate::{
    claims::TokenPurpose,
    directory::{DirectoryError, UserDirectory},
    store::{SecretStore, SecretStoreError},
};

#[derive(Debug, Default)]
pub struct MemorySecretStore {
    entries: Mutex<HashMap<(UserId, TokenPurpose), (String, Instant)>>,
    failing_writes: Mutex<HashSet<TokenPurpose>>,
    failing_reads: Mutex<HashSet<TokenPurpose>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write for `purpose` fail as if the store were down.
    pub async fn fail_writes(&self, purpose: TokenPurpose) {
        self.failing_writes.lock().await.insert(purpose);
    }

    /// Makes every subsequent read for `purpose` fail as if the store were down.
    pub async fn fail_reads(&self, purpose: TokenPurpose) {
        self.failing_reads.lock().await.insert(purpose);
    }

    /// The live secret for a pair, if any. Ignores injected read failures.
    pub async fn current(&self, user_id: UserId, purpose: TokenPurpose) -> Option<String> {
        let mut entries = self.entries.lock().await;
        match entries.get(&(user_id, purpose)) {
            Some((secret, expires_at)) if Instant::now() < *expires_at => Some(secret.clone()),
            Some(_) => {
                entries.remove(&(user_id, purpose));
                None
            }
            None => None,
        }
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn set_secret(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
        secret: &str,
        ttl: Duration,
    ) -> Result<(), SecretStoreError> {
        if self.failing_writes.lock().await.contains(&purpose) {
            return Err(SecretStoreError::Unavailable(anyhow!(
                "simulated outage writing {purpose} secret"
            )));
        }

        self.entries
            .lock()
            .await
            .insert((user_id, purpose), (secret.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn get_secret(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
    ) -> Result<String, SecretStoreError> {
        if self.failing_reads.lock().await.contains(&purpose) {
            return Err(SecretStoreError::Unavailable(anyhow!(
                "simulated outage reading {purpose} secret"
            )));
        }

        self.current(user_id, purpose)
            .await
            .ok_or(SecretStoreError::NotFound)
    }

    async fn delete_secret(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
    ) -> Result<(), SecretStoreError> {
        self.entries.lock().await.remove(&(user_id, purpose));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: Mutex<HashMap<UserId, UserCredentials>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn get_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DirectoryError> {
        let users = self.users.lock().await;
        Ok(users.values().find(|u| u.user.email == email).cloned())
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, DirectoryError> {
        let users = self.users.lock().await;
        Ok(users.get(&id).map(|u| u.user.clone()))
    }

    async fn create(&self, user: NewUser) -> Result<(), DirectoryError> {
        let mut users = self.users.lock().await;
        if users.contains_key(&user.id) || users.values().any(|u| u.user.email == user.email) {
            return Err(DirectoryError::Conflict);
        }

        users.insert(
            user.id,
            UserCredentials {
                user: User {
                    id: user.id,
                    first_name: user.first_name,
                    last_name: user.last_name,
                    email: user.email,
                    status: user.status,
                    role: user.role,
                    created_at: Utc::now(),
                },
                password_hash: user.password_hash,
            },
        );
        Ok(())
    }

    async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, DirectoryError> {
        let mut users = self.users.lock().await;
        let Some(stored) = users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(first_name) = changes.first_name {
            stored.user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            stored.user.last_name = last_name;
        }
        if let Some(password_hash) = changes.password_hash {
            stored.password_hash = password_hash;
        }
        if let Some(status) = changes.status {
            stored.user.status = status;
        }
        if let Some(role) = changes.role {
            stored.user.role = role;
        }

        Ok(Some(stored.user.clone()))
    }
}
