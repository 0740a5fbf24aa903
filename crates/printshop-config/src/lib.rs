//! # Printshop Config
//!
//! Configuration types for the Printshop API, loaded from environment
//! variables (and, for the access table, a JSON file):
//!
//! - [`security`]: token lifetimes and credential hashing
//! - [`server`]: listen address and API base path
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`access`]: the route → method → roles table consulted by the authorization gate
//!
//! # Example
//!
//! ```ignore
//! use printshop_config::{AccessTable, CorsConfig, SecurityConfig, ServerConfig};
//!
//! let security = SecurityConfig::from_env()?;
//! let server = ServerConfig::from_env()?;
//! let cors = CorsConfig::from_env();
//! let access = AccessTable::from_env()?;
//! ```

pub mod access;
pub mod cors;
pub mod error;
pub mod security;
pub mod server;

pub use access::{AccessRole, AccessTable};
pub use cors::CorsConfig;
pub use error::ConfigError;
pub use security::{PasswordScheme, SecurityConfig};
pub use server::ServerConfig;
