use std::{env, fmt, str::FromStr, time::Duration};

use crate::ConfigError;

const DEV_SALT: &str = "printshop-development-salt";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PasswordScheme {
    #[default]
    Sha256,
    Bcrypt,
}

impl FromStr for PasswordScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" => Ok(Self::Sha256),
            "bcrypt" => Ok(Self::Bcrypt),
            _ => Err(ConfigError::Invalid {
                var: "PASSWORD_SCHEME",
                value: s.to_string(),
            }),
        }
    }
}

/// Token lifetimes and credential hashing settings.
#[derive(Clone)]
pub struct SecurityConfig {
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub hash_salt: String,
    pub password_scheme: PasswordScheme,
    pub bcrypt_cost: u32,
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("hash_salt", &"<redacted>")
            .field("password_scheme", &self.password_scheme)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            access_token_ttl: Duration::from_secs(900), // 15 minutes
            refresh_token_ttl: Duration::from_secs(604_800), // 7 days
            hash_salt: DEV_SALT.to_string(),
            password_scheme: PasswordScheme::Sha256,
            bcrypt_cost: 12,
        }
    }
}

impl SecurityConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let hash_salt = match env::var("PASSWORD_HASH_SALT") {
            Ok(salt) if !salt.is_empty() => salt,
            _ if cfg!(debug_assertions) => defaults.hash_salt,
            _ => return Err(ConfigError::Missing("PASSWORD_HASH_SALT")),
        };

        let password_scheme = match env::var("PASSWORD_SCHEME") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.password_scheme,
        };

        Ok(Self {
            access_token_ttl: seconds_var("ACCESS_TOKEN_TTL_SECONDS")?
                .unwrap_or(defaults.access_token_ttl),
            refresh_token_ttl: seconds_var("REFRESH_TOKEN_TTL_SECONDS")?
                .unwrap_or(defaults.refresh_token_ttl),
            hash_salt,
            password_scheme,
            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.bcrypt_cost),
        })
    }
}

fn seconds_var(var: &'static str) -> Result<Option<Duration>, ConfigError> {
    match env::var(var) {
        Ok(value) => parse_seconds(var, &value).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_seconds(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_scheme_parse() {
        assert_eq!("sha256".parse::<PasswordScheme>().unwrap(), PasswordScheme::Sha256);
        assert_eq!("BCRYPT".parse::<PasswordScheme>().unwrap(), PasswordScheme::Bcrypt);
        assert!("argon2".parse::<PasswordScheme>().is_err());
    }

    #[test]
    fn test_parse_seconds_rejects_zero_and_garbage() {
        assert_eq!(
            parse_seconds("X", "60").unwrap(),
            Duration::from_secs(60)
        );
        assert!(parse_seconds("X", "0").is_err());
        assert!(parse_seconds("X", "15m").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = SecurityConfig::default();
        assert_eq!(config.access_token_ttl, Duration::from_secs(900));
        assert_eq!(config.refresh_token_ttl, Duration::from_secs(604_800));
        assert_eq!(config.password_scheme, PasswordScheme::Sha256);
    }

    #[test]
    fn test_debug_redacts_salt() {
        let config = SecurityConfig {
            hash_salt: "do-not-print".into(),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("do-not-print"));
    }
}
