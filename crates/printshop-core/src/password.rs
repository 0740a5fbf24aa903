//! Credential hashing.
//!
//! The default scheme is a deterministic SHA-256 over `plaintext || salt`,
//! hex-encoded, with one process-wide salt. `bcrypt` is available as a
//! hardened alternative with per-hash random salts.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("failed to hash password: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

#[derive(Clone)]
pub enum CredentialHasher {
    SaltedSha256 { salt: String },
    Bcrypt { cost: u32 },
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SaltedSha256 { .. } => f
                .debug_struct("SaltedSha256")
                .field("salt", &"<redacted>")
                .finish(),
            Self::Bcrypt { cost } => f.debug_struct("Bcrypt").field("cost", cost).finish(),
        }
    }
}

impl CredentialHasher {
    pub fn salted_sha256(salt: impl Into<String>) -> Self {
        Self::SaltedSha256 { salt: salt.into() }
    }

    pub fn bcrypt(cost: u32) -> Self {
        Self::Bcrypt { cost }
    }

    /// Hashes a plaintext password. The SHA-256 scheme never fails.
    pub fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        match self {
            Self::SaltedSha256 { salt } => Ok(salted_digest(plaintext, salt)),
            Self::Bcrypt { cost } => Ok(bcrypt::hash(plaintext, *cost)?),
        }
    }

    pub fn verify(&self, plaintext: &str, stored: &str) -> bool {
        match self {
            Self::SaltedSha256 { salt } => {
                let computed = salted_digest(plaintext, salt);
                computed.as_bytes().ct_eq(stored.as_bytes()).into()
            }
            Self::Bcrypt { .. } => match bcrypt::verify(plaintext, stored) {
                Ok(matches) => matches,
                Err(e) => {
                    tracing::warn!(error = %e, "stored password hash is not a bcrypt hash");
                    false
                }
            },
        }
    }
}

fn salted_digest(plaintext: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}
