use anyhow::Context;
use printshop_core::{AppError, ErrorCode};
use printshop_models::{
    ProducerId,
    producers::{CreateProducerRequest, Producer, UpdateProducerRequest},
};
use sqlx::PgPool;
use tracing::{info, instrument, warn};

const PRODUCER_COLUMNS: &str = "id, name, description, created_at";

pub struct ProducerService;

impl ProducerService {
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "producers"))]
    pub async fn list_producers(db: &PgPool) -> Result<Vec<Producer>, AppError> {
        sqlx::query_as::<_, Producer>(&format!(
            "SELECT {PRODUCER_COLUMNS} FROM producers ORDER BY name"
        ))
        .fetch_all(db)
        .await
        .context("failed to list producers")
        .map_err(AppError::database)
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "producers"))]
    pub async fn get_producer(db: &PgPool, id: ProducerId) -> Result<Producer, AppError> {
        sqlx::query_as::<_, Producer>(&format!(
            "SELECT {PRODUCER_COLUMNS} FROM producers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("failed to fetch producer")
        .map_err(AppError::database)?
        .ok_or_else(AppError::not_found)
    }

    #[instrument(skip(db, request), fields(producer.name = %request.name, db.operation = "INSERT", db.table = "producers"))]
    pub async fn create_producer(
        db: &PgPool,
        request: CreateProducerRequest,
    ) -> Result<Producer, AppError> {
        let producer = sqlx::query_as::<_, Producer>(&format!(
            "INSERT INTO producers (id, name, description) VALUES ($1, $2, $3)
             RETURNING {PRODUCER_COLUMNS}"
        ))
        .bind(ProducerId::new())
        .bind(&request.name)
        .bind(&request.description)
        .fetch_one(db)
        .await
        .context("failed to create producer")
        .map_err(AppError::database)?;

        info!(producer.id = %producer.id, "Producer created");
        Ok(producer)
    }

    #[instrument(skip(db, request), fields(db.operation = "UPDATE", db.table = "producers"))]
    pub async fn update_producer(
        db: &PgPool,
        id: ProducerId,
        request: UpdateProducerRequest,
    ) -> Result<Producer, AppError> {
        sqlx::query_as::<_, Producer>(&format!(
            "UPDATE producers SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE id = $1
             RETURNING {PRODUCER_COLUMNS}"
        ))
        .bind(id)
        .bind(request.name)
        .bind(request.description)
        .fetch_optional(db)
        .await
        .context("failed to update producer")
        .map_err(AppError::database)?
        .ok_or_else(AppError::not_found)
    }

    /// Fails with [`ErrorCode::ProducerIsUsed`] while any product references the producer.
    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "producers"))]
    pub async fn delete_producer(db: &PgPool, id: ProducerId) -> Result<(), AppError> {
        let in_use: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE producer_id = $1)")
                .bind(id)
                .fetch_one(db)
                .await
                .context("failed to check producer usage")
                .map_err(AppError::database)?;

        if in_use {
            warn!(producer.id = %id, "Refusing to delete producer with products");
            return Err(ErrorCode::ProducerIsUsed.into());
        }

        let result = sqlx::query("DELETE FROM producers WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_foreign_key_violation()
                {
                    return AppError::from_code(ErrorCode::ProducerIsUsed);
                }
                AppError::database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found());
        }

        info!(producer.id = %id, "Producer deleted");
        Ok(())
    }
}
