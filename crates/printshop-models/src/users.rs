//! User domain models and DTOs.

use chrono::{DateTime, Utc};
use printshop_config::AccessRole;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    Admin,
}

impl From<UserRole> for AccessRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Customer => AccessRole::Customer,
            UserRole::Admin => AccessRole::Admin,
        }
    }
}

/// A registered user as exposed to clients. Never carries the password hash.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub status: UserStatus,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// A user together with the stored credential, used only for login.
#[derive(FromRow, Debug, Clone)]
pub struct UserCredentials {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

/// A fully prepared record ready to be persisted by the user directory.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub status: UserStatus,
    pub role: UserRole,
}

/// Partial update applied by the user directory. `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: Option<String>,
    pub status: Option<UserStatus>,
    pub role: Option<UserRole>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.password_hash.is_none()
            && self.status.is_none()
            && self.role.is_none()
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 25))]
    #[schema(example = "Ivan")]
    pub first_name: String,
    #[validate(length(min = 3, max = 25))]
    #[schema(example = "Petrov")]
    pub last_name: String,
    #[validate(email)]
    #[schema(example = "ivan@example.com")]
    pub email: String,
    #[validate(length(min = 8, max = 60))]
    #[schema(example = "password1234")]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 25))]
    pub first_name: Option<String>,
    #[validate(length(min = 3, max = 25))]
    pub last_name: Option<String>,
    #[validate(length(min = 8, max = 60))]
    pub password: Option<String>,
}

/// Admin-side update. Besides profile fields it can block a user or change their role.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 25))]
    pub first_name: Option<String>,
    #[validate(length(min = 3, max = 25))]
    pub last_name: Option<String>,
    #[validate(length(min = 8, max = 60))]
    pub password: Option<String>,
    pub status: Option<UserStatus>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilterParams {
    pub user_status: Option<UserStatus>,
    pub user_role: Option<UserRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(first: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: first.into(),
            last_name: "Petrov".into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register("Ivan", "ivan@example.com", "password1234").validate().is_ok());
        assert!(register("Iv", "ivan@example.com", "password1234").validate().is_err());
        assert!(register("Ivan", "not-an-email", "password1234").validate().is_err());
        assert!(register("Ivan", "ivan@example.com", "short").validate().is_err());
        assert!(register("Ivan", "ivan@example.com", &"x".repeat(61)).validate().is_err());
    }

    #[test]
    fn test_profile_update_skips_absent_fields() {
        assert!(UpdateProfileRequest::default().validate().is_ok());

        let request = UpdateProfileRequest {
            password: Some("short".into()),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_enums_use_snake_case() {
        assert_eq!(serde_json::to_string(&UserStatus::Blocked).unwrap(), "\"blocked\"");
        assert_eq!(
            serde_json::from_str::<UserRole>("\"admin\"").unwrap(),
            UserRole::Admin
        );
    }

    #[test]
    fn test_role_maps_to_access_role() {
        assert_eq!(AccessRole::from(UserRole::Customer), AccessRole::Customer);
        assert_eq!(AccessRole::from(UserRole::Admin), AccessRole::Admin);
    }

    #[test]
    fn test_user_changes_is_empty() {
        assert!(UserChanges::default().is_empty());
        let changes = UserChanges {
            role: Some(UserRole::Admin),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
