use async_trait::async_trait;
use printshop_models::{NewUser, User, UserChanges, UserCredentials, UserId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A unique constraint was hit, e.g. two registrations racing on one email.
    #[error("user already exists")]
    Conflict,

    #[error("user directory unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),
}

/// Persistent store of user records consulted by the session manager.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DirectoryError>;

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, DirectoryError>;

    async fn create(&self, user: NewUser) -> Result<(), DirectoryError>;

    /// Applies `changes` and returns the updated record, or `None` if the user does not exist.
    async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, DirectoryError>;
}
