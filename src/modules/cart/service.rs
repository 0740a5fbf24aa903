use anyhow::Context;
use printshop_core::{AppError, ErrorCode};
use printshop_models::{
    UserId,
    cart::{AddToCartRequest, CartItem},
};
use sqlx::{PgExecutor, PgPool};
use tracing::{debug, info, instrument};

use crate::modules::products::service::ProductService;

pub struct CartService;

impl CartService {
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "cart_items"))]
    pub async fn get_cart(db: &PgPool, user_id: UserId) -> Result<Vec<CartItem>, AppError> {
        Self::items(db, user_id, false).await
    }

    /// Sets the count of a product in the cart. A count of zero removes it.
    #[instrument(skip(db, request), fields(product.id = %request.product_id, count = request.count))]
    pub async fn set_item(
        db: &PgPool,
        user_id: UserId,
        request: AddToCartRequest,
    ) -> Result<Vec<CartItem>, AppError> {
        let product = ProductService::find(db, request.product_id)
            .await?
            .ok_or_else(|| AppError::from_code(ErrorCode::ProductNotExist))?;

        if product.is_hidden() && request.count > 0 {
            debug!(product.id = %product.id, "Refusing to add hidden product to cart");
            return Err(ErrorCode::ProductNotExist.into());
        }

        if request.count == 0 {
            sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
                .bind(user_id)
                .bind(product.id)
                .execute(db)
                .await
                .context("failed to remove cart item")
                .map_err(AppError::database)?;
        } else {
            sqlx::query(
                "INSERT INTO cart_items (user_id, product_id, count) VALUES ($1, $2, $3)
                 ON CONFLICT (user_id, product_id) DO UPDATE SET count = EXCLUDED.count",
            )
            .bind(user_id)
            .bind(product.id)
            .bind(request.count)
            .execute(db)
            .await
            .context("failed to upsert cart item")
            .map_err(AppError::database)?;
        }

        info!(user.id = %user_id, product.id = %product.id, count = request.count, "Cart updated");
        Self::get_cart(db, user_id).await
    }

    /// Cart contents joined with the current product records.
    ///
    /// With `lock` the rows are selected `FOR UPDATE`, for use inside a transaction.
    pub(crate) async fn items<'e>(
        executor: impl PgExecutor<'e>,
        user_id: UserId,
        lock: bool,
    ) -> Result<Vec<CartItem>, AppError> {
        let sql = format!(
            "SELECT p.id, p.name, p.price, p.producer_id, p.status, p.created_at, c.count
             FROM cart_items c
             JOIN products p ON p.id = c.product_id
             WHERE c.user_id = $1
             ORDER BY p.name{}",
            if lock { " FOR UPDATE OF c" } else { "" }
        );

        sqlx::query_as::<_, CartItem>(&sql)
            .bind(user_id)
            .fetch_all(executor)
            .await
            .context("failed to fetch cart")
            .map_err(AppError::database)
    }
}
