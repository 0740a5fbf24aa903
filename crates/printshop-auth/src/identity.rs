use printshop_config::AccessRole;
use printshop_models::{User, UserId, UserRole, UserStatus};

/// The caller behind a validated access token, resolved fresh from the user
/// directory on every validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
}

impl AuthenticatedIdentity {
    pub fn is_blocked(&self) -> bool {
        self.status == UserStatus::Blocked
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn access_role(&self) -> AccessRole {
        self.role.into()
    }
}

impl From<User> for AuthenticatedIdentity {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            status: user.status,
        }
    }
}
