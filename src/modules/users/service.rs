use anyhow::Context;
use printshop_auth::SessionManager;
use printshop_core::AppError;
use printshop_models::{
    User, UserChanges, UserId,
    users::{UpdateProfileRequest, UpdateUserRequest, UserFilterParams},
};
use sqlx::PgPool;
use tracing::{debug, info, instrument};

use super::directory::USER_COLUMNS;

pub struct UserService;

impl UserService {
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn list_users(db: &PgPool, filters: UserFilterParams) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE ($1::user_status IS NULL OR status = $1)
               AND ($2::user_role IS NULL OR role = $2)
             ORDER BY created_at DESC"
        ))
        .bind(filters.user_status)
        .bind(filters.user_role)
        .fetch_all(db)
        .await
        .context("failed to list users")
        .map_err(AppError::database)?;

        debug!(count = users.len(), "Users fetched");
        Ok(users)
    }

    #[instrument(skip(sessions))]
    pub async fn get_user(sessions: &SessionManager, id: UserId) -> Result<User, AppError> {
        sessions
            .directory()
            .get_by_id(id)
            .await
            .map_err(AppError::internal)?
            .ok_or_else(AppError::not_found)
    }

    /// Admin update. A new password is re-hashed with the configured hasher.
    #[instrument(skip(sessions, request))]
    pub async fn update_user(
        sessions: &SessionManager,
        id: UserId,
        request: UpdateUserRequest,
    ) -> Result<User, AppError> {
        let changes = UserChanges {
            first_name: request.first_name,
            last_name: request.last_name,
            password_hash: hash_optional(sessions, request.password.as_deref())?,
            status: request.status,
            role: request.role,
        };

        let user = Self::apply(sessions, id, changes).await?;
        info!(user.id = %user.id, user.status = ?user.status, user.role = ?user.role, "User updated");
        Ok(user)
    }

    #[instrument(skip(sessions, request))]
    pub async fn update_profile(
        sessions: &SessionManager,
        id: UserId,
        request: UpdateProfileRequest,
    ) -> Result<User, AppError> {
        let changes = UserChanges {
            first_name: request.first_name,
            last_name: request.last_name,
            password_hash: hash_optional(sessions, request.password.as_deref())?,
            ..Default::default()
        };

        Self::apply(sessions, id, changes).await
    }

    /// Deletes the account and revokes any outstanding tokens.
    #[instrument(skip(db, sessions), fields(db.operation = "DELETE", db.table = "users"))]
    pub async fn delete_user(
        db: &PgPool,
        sessions: &SessionManager,
        id: UserId,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("failed to delete user")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found());
        }

        sessions.logout(id).await?;
        info!(user.id = %id, "User deleted");
        Ok(())
    }

    async fn apply(
        sessions: &SessionManager,
        id: UserId,
        changes: UserChanges,
    ) -> Result<User, AppError> {
        sessions
            .directory()
            .update(id, changes)
            .await
            .map_err(AppError::internal)?
            .ok_or_else(AppError::not_found)
    }
}

fn hash_optional(
    sessions: &SessionManager,
    password: Option<&str>,
) -> Result<Option<String>, AppError> {
    password
        .map(|p| sessions.hash_password(p))
        .transpose()
        .map_err(AppError::from)
}
