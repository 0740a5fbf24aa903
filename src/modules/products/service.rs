use anyhow::Context;
use printshop_core::{AppError, ErrorCode};
use printshop_models::{
    ProducerId, ProductId,
    products::{CreateProductRequest, Product, ProductFilterParams, UpdateProductRequest},
};
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};

pub(crate) const PRODUCT_COLUMNS: &str = "id, name, price, producer_id, status, created_at";

/// Maps a foreign key violation on `producer_id` to code 10.
fn producer_fk_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_foreign_key_violation()
    {
        return AppError::from_code(ErrorCode::ProducerNotExist);
    }
    AppError::database(e)
}

pub struct ProductService;

impl ProductService {
    /// Non-admins only see published products.
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "products"))]
    pub async fn list_products(
        db: &PgPool,
        filters: ProductFilterParams,
        include_hidden: bool,
    ) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE ($1::uuid IS NULL OR producer_id = $1)
               AND ($2 OR status = 'published')
             ORDER BY created_at DESC"
        ))
        .bind(filters.producer_id)
        .bind(include_hidden)
        .fetch_all(db)
        .await
        .context("failed to list products")
        .map_err(AppError::database)?;

        debug!(count = products.len(), "Products fetched");
        Ok(products)
    }

    /// A hidden product is reported as missing unless `include_hidden` is set.
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "products"))]
    pub async fn get_product(
        db: &PgPool,
        id: ProductId,
        include_hidden: bool,
    ) -> Result<Product, AppError> {
        Self::find(db, id)
            .await?
            .filter(|product| include_hidden || !product.is_hidden())
            .ok_or_else(AppError::not_found)
    }

    pub(crate) async fn find(db: &PgPool, id: ProductId) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("failed to fetch product")
        .map_err(AppError::database)
    }

    #[instrument(skip(db, request), fields(product.name = %request.name, db.operation = "INSERT", db.table = "products"))]
    pub async fn create_product(
        db: &PgPool,
        request: CreateProductRequest,
    ) -> Result<Product, AppError> {
        Self::ensure_producer(db, request.producer_id).await?;

        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (id, name, price, producer_id, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(ProductId::new())
        .bind(&request.name)
        .bind(request.price)
        .bind(request.producer_id)
        .bind(request.status)
        .fetch_one(db)
        .await
        .map_err(producer_fk_error)?;

        info!(product.id = %product.id, product.status = ?product.status, "Product created");
        Ok(product)
    }

    #[instrument(skip(db, request), fields(db.operation = "UPDATE", db.table = "products"))]
    pub async fn update_product(
        db: &PgPool,
        id: ProductId,
        request: UpdateProductRequest,
    ) -> Result<Product, AppError> {
        if let Some(producer_id) = request.producer_id {
            Self::ensure_producer(db, producer_id).await?;
        }

        sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET
                name = COALESCE($2, name),
                price = COALESCE($3, price),
                producer_id = COALESCE($4, producer_id),
                status = COALESCE($5, status)
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(request.name)
        .bind(request.price)
        .bind(request.producer_id)
        .bind(request.status)
        .fetch_optional(db)
        .await
        .map_err(producer_fk_error)?
        .ok_or_else(AppError::not_found)
    }

    /// Fails with [`ErrorCode::ProductIsUsed`] while a cart or an order references the product.
    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "products"))]
    pub async fn delete_product(db: &PgPool, id: ProductId) -> Result<(), AppError> {
        let in_use: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM cart_items WHERE product_id = $1)
                 OR EXISTS (SELECT 1 FROM order_products WHERE product_id = $1)",
        )
        .bind(id)
        .fetch_one(db)
        .await
        .context("failed to check product usage")
        .map_err(AppError::database)?;

        if in_use {
            warn!(product.id = %id, "Refusing to delete product in use");
            return Err(ErrorCode::ProductIsUsed.into());
        }

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_foreign_key_violation()
                {
                    return AppError::from_code(ErrorCode::ProductIsUsed);
                }
                AppError::database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found());
        }

        info!(product.id = %id, "Product deleted");
        Ok(())
    }

    async fn ensure_producer(db: &PgPool, id: ProducerId) -> Result<(), AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM producers WHERE id = $1)")
            .bind(id)
            .fetch_one(db)
            .await
            .context("failed to check producer")
            .map_err(AppError::database)?;

        if exists {
            Ok(())
        } else {
            Err(ErrorCode::ProducerNotExist.into())
        }
    }
}
