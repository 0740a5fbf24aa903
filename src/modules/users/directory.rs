//! Postgres-backed [`UserDirectory`].

use async_trait::async_trait;
use printshop_auth::{DirectoryError, UserDirectory};
use printshop_models::{NewUser, User, UserChanges, UserCredentials, UserId};
use sqlx::PgPool;
use tracing::{error, instrument};

pub(crate) const USER_COLUMNS: &str = "id, first_name, last_name, email, status, role, created_at";

#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    db: PgPool,
}

impl PgUserDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn unavailable(err: sqlx::Error) -> DirectoryError {
    error!(error = %err, "User directory query failed");
    DirectoryError::Unavailable(err.into())
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "users"))]
    async fn get_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DirectoryError> {
        sqlx::query_as::<_, UserCredentials>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(unavailable)
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "users"))]
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, DirectoryError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(unavailable)
    }

    #[instrument(skip(self, user), fields(user.id = %user.id, db.operation = "INSERT", db.table = "users"))]
    async fn create(&self, user: NewUser) -> Result<(), DirectoryError> {
        sqlx::query(
            "INSERT INTO users (id, first_name, last_name, email, password_hash, status, role)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.status)
        .bind(user.role)
        .execute(&self.db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return DirectoryError::Conflict;
            }
            unavailable(e)
        })?;

        Ok(())
    }

    #[instrument(skip(self, changes), fields(db.operation = "UPDATE", db.table = "users"))]
    async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, DirectoryError> {
        if changes.is_empty() {
            return self.get_by_id(id).await;
        }

        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                password_hash = COALESCE($4, password_hash),
                status = COALESCE($5, status),
                role = COALESCE($6, role)
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.password_hash)
        .bind(changes.status)
        .bind(changes.role)
        .fetch_optional(&self.db)
        .await
        .map_err(unavailable)
    }
}
