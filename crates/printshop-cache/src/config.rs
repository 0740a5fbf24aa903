//! Redis connection settings.

use std::env;

/// Redis configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `REDIS_URL`: Redis connection URL (default: `redis://127.0.0.1:6379`)
/// - `SECRET_KEY_PREFIX`: namespace prepended to every secret key (default: empty)
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub redis_url: String,
    pub key_prefix: String,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            key_prefix: env::var("SECRET_KEY_PREFIX").unwrap_or(defaults.key_prefix),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".into(),
            key_prefix: String::new(),
        }
    }
}
