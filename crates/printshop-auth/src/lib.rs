//! # Printshop Auth
//!
//! Session and token authentication engine.
//!
//! Every user holds at most one live signing secret per [`TokenPurpose`]
//! (access and refresh), kept in a [`SecretStore`] with its own TTL. Tokens
//! are HS256 JWTs carrying `{iss: user id, exp}` signed with that secret, so
//! overwriting or deleting the secret revokes every token signed under it.
//!
//! - [`claims`]: token claims and purposes
//! - [`store`]: the secret store port
//! - [`directory`]: the user directory port
//! - [`jwt`]: [`TokenIssuer`] and [`TokenValidator`]
//! - [`session`]: [`SessionManager`], which orchestrates register, login,
//!   validation, refresh and logout
//!
//! # Example
//!
//! ```ignore
//! use printshop_auth::SessionManager;
//!
//! let sessions = SessionManager::from_config(directory, store, &security_config);
//!
//! let pair = sessions.login("ivan@example.com", "password1234").await?;
//! let identity = sessions.validate_token(&pair.token).await?;
//! let rotated = sessions.refresh_token(&pair.refresh_token).await?;
//! ```

pub mod claims;
pub mod directory;
pub mod error;
pub mod identity;
pub mod jwt;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod session;
pub mod store;

pub use claims::{Claims, TokenPurpose};
pub use directory::{DirectoryError, UserDirectory};
pub use error::AuthError;
pub use identity::AuthenticatedIdentity;
pub use jwt::{TokenIssuer, TokenValidator, generate_secret};
pub use session::SessionManager;
pub use store::{SecretStore, SecretStoreError};
