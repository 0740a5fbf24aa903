use printshop_core::{AppError, ErrorCode, HashError};
use thiserror::Error;

use crate::{directory::DirectoryError, store::SecretStoreError};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. The two are not distinguished.
    #[error("wrong email or password")]
    InvalidCredentials,

    #[error("user with this email already exists")]
    EmailAlreadyExists,

    #[error("user is blocked")]
    UserIsBlocked,

    /// Malformed, expired, wrongly signed, or its secret is gone.
    #[error("invalid token")]
    InvalidToken,

    #[error(transparent)]
    SecretStore(SecretStoreError),

    #[error(transparent)]
    Directory(DirectoryError),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// Store and directory transport failures, surfaced as internal errors.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::SecretStore(_) | Self::Directory(_) | Self::Hash(_) | Self::Signing(_)
        )
    }
}

impl From<DirectoryError> for AuthError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Conflict => Self::EmailAlreadyExists,
            other => Self::Directory(other),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::from_code(ErrorCode::WrongEmailOrPassword),
            AuthError::EmailAlreadyExists => AppError::from_code(ErrorCode::EmailAlreadyExists),
            AuthError::UserIsBlocked => AppError::from_code(ErrorCode::UserIsBlocked),
            AuthError::InvalidToken => AppError::invalid_token(),
            upstream => AppError::internal(upstream),
        }
    }
}
