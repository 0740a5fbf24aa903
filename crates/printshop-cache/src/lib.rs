//! # Printshop Cache
//!
//! Redis-backed storage for per-user token signing secrets.
//!
//! # Example
//!
//! ```ignore
//! use printshop_cache::{CacheConfig, RedisSecretStore};
//!
//! let config = CacheConfig::from_env();
//! let store = RedisSecretStore::connect(&config).await?;
//! ```

pub mod config;
pub mod keys;
pub mod redis;

pub use config::CacheConfig;
pub use keys::secret_key;
pub use redis::{CacheError, RedisSecretStore};
