//! # Printshop Core
//!
//! Foundational types shared by every Printshop crate:
//!
//! - [`errors`]: [`AppError`] and the stable [`ErrorCode`] wire contract
//! - [`password`]: the [`CredentialHasher`] used for stored credentials

pub mod errors;
pub mod password;

pub use errors::{AppError, ErrorCode};
pub use password::{CredentialHasher, HashError};
