//! Route access table.
//!
//! A JSON document mapping a route template (relative to the API base path)
//! to the HTTP methods it accepts and the roles allowed to call each one:
//!
//! ```json
//! {
//!   "/products": { "GET": ["guest", "customer", "admin"], "POST": ["admin"] },
//!   "/products/{id}": { "GET": ["guest", "customer", "admin"] }
//! }
//! ```
//!
//! Anything not listed is denied.

use std::{collections::HashMap, env, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRole {
    Guest,
    Customer,
    Admin,
}

impl AccessRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccessTable {
    routes: HashMap<String, HashMap<String, Vec<AccessRole>>>,
}

impl AccessTable {
    pub fn from_env() -> Result<Self, ConfigError> {
        let path =
            env::var("ACCESS_TABLE_PATH").unwrap_or_else(|_| "config/access.json".to_string());
        Self::from_file(path)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let parsed: HashMap<String, HashMap<String, Vec<AccessRole>>> = serde_json::from_str(raw)?;

        let routes = parsed
            .into_iter()
            .map(|(route, methods)| {
                let methods = methods
                    .into_iter()
                    .map(|(method, roles)| (method.to_ascii_uppercase(), roles))
                    .collect();
                (route, methods)
            })
            .collect();

        Ok(Self { routes })
    }

    /// Roles allowed to call `method` on `route`, or `None` if the pair is not listed.
    pub fn allowed_roles(&self, route: &str, method: &str) -> Option<&[AccessRole]> {
        self.routes
            .get(route)?
            .get(&method.to_ascii_uppercase())
            .map(Vec::as_slice)
    }

    pub fn is_allowed(&self, route: &str, method: &str, role: AccessRole) -> bool {
        self.allowed_roles(route, method)
            .is_some_and(|roles| roles.contains(&role))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "/products": { "GET": ["guest", "customer", "admin"], "post": ["admin"] },
        "/users": { "GET": ["admin"] }
    }"#;

    #[test]
    fn test_parse_and_lookup() {
        let table = AccessTable::from_json_str(TABLE).unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.is_allowed("/products", "GET", AccessRole::Guest));
        assert!(table.is_allowed("/products", "POST", AccessRole::Admin));
        assert!(!table.is_allowed("/products", "POST", AccessRole::Customer));
        assert!(!table.is_allowed("/users", "GET", AccessRole::Customer));
    }

    #[test]
    fn test_methods_are_case_insensitive() {
        let table = AccessTable::from_json_str(TABLE).unwrap();
        assert!(table.is_allowed("/products", "post", AccessRole::Admin));
    }

    #[test]
    fn test_unlisted_route_or_method_is_denied() {
        let table = AccessTable::from_json_str(TABLE).unwrap();

        assert!(table.allowed_roles("/orders", "GET").is_none());
        assert!(table.allowed_roles("/users", "DELETE").is_none());
        assert!(!table.is_allowed("/orders", "GET", AccessRole::Admin));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result = AccessTable::from_json_str(r#"{ "/x": { "GET": ["superuser"] } }"#);
        assert!(matches!(result, Err(ConfigError::AccessTable(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = AccessTable::from_file("/nonexistent/access.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
