//! JWT claims and token purposes.

use std::{fmt, time::Duration};

use chrono::Utc;
use printshop_models::UserId;
use serde::{Deserialize, Serialize};

/// Which of the two token kinds a secret or token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenPurpose {
    Access,
    Refresh,
}

impl TokenPurpose {
    /// Key prefix used to namespace secrets in the store.
    pub const fn key_prefix(self) -> &'static str {
        match self {
            Self::Access => "token_",
            Self::Refresh => "refresh_",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims carried by both access and refresh tokens.
///
/// The purpose is not encoded in the token: an access token cannot be used
/// as a refresh token because it is verified against a different secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity of the user the token was issued to
    pub iss: String,
    /// Expiration timestamp (Unix seconds)
    pub exp: u64,
}

impl Claims {
    pub fn new(user_id: UserId, ttl: Duration) -> Self {
        let now = Utc::now().timestamp().max(0) as u64;
        Self {
            iss: user_id.to_string(),
            exp: now.saturating_add(ttl.as_secs()),
        }
    }
}
