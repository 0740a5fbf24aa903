use std::collections::HashMap;

use anyhow::Context;
use printshop_core::{AppError, ErrorCode};
use printshop_models::{
    OrderId, ProductId, UserId,
    orders::{
        Order, OrderFilterParams, OrderItem, OrderProductRequest, OrderRow, OrderStatus,
        UpdateOrderRequest,
    },
    products::ProductStatus,
};
use sqlx::{FromRow, PgExecutor, PgPool, Postgres, Transaction};
use tracing::{debug, info, instrument, warn};

use crate::modules::cart::service::CartService;

const ORDER_COLUMNS: &str = "id, user_id, status, created_at";

#[derive(FromRow)]
struct OrderItemRow {
    order_id: OrderId,
    #[sqlx(flatten)]
    item: OrderItem,
}

#[derive(FromRow)]
struct PricedProduct {
    id: ProductId,
    price: f64,
    status: ProductStatus,
}

/// Sums counts of repeated product ids, keeping first-seen order.
fn merge_lines(lines: &[OrderProductRequest]) -> Vec<(ProductId, i32)> {
    let mut merged: Vec<(ProductId, i32)> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.iter_mut().find(|(id, _)| *id == line.id) {
            Some((_, count)) => *count += line.count,
            None => merged.push((line.id, line.count)),
        }
    }
    merged
}

pub struct OrderService;

impl OrderService {
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "orders"))]
    pub async fn list_orders(
        db: &PgPool,
        filters: OrderFilterParams,
    ) -> Result<Vec<Order>, AppError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE ($1::uuid IS NULL OR user_id = $1)
               AND ($2::order_status IS NULL OR status = $2)
             ORDER BY created_at DESC"
        ))
        .bind(filters.user_id)
        .bind(filters.order_status)
        .fetch_all(db)
        .await
        .context("failed to list orders")
        .map_err(AppError::database)?;

        let ids: Vec<OrderId> = rows.iter().map(|row| row.id).collect();
        let mut items = Self::items(db, &ids).await?;

        debug!(count = rows.len(), "Orders fetched");
        Ok(rows
            .into_iter()
            .map(|row| {
                let products = items.remove(&row.id).unwrap_or_default();
                Order::from_row(row, products)
            })
            .collect())
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "orders"))]
    pub async fn get_order(db: &PgPool, id: OrderId) -> Result<Order, AppError> {
        Self::find(db, id).await?.ok_or_else(AppError::not_found)
    }

    /// Turns the caller's cart into a new order and empties the cart.
    ///
    /// Hidden products are left out and prices are captured as of now.
    #[instrument(skip(db), fields(db.operation = "INSERT", db.table = "orders"))]
    pub async fn create_order(db: &PgPool, user_id: UserId) -> Result<Order, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("failed to begin transaction")
            .map_err(AppError::database)?;

        let cart = CartService::items(&mut *tx, user_id, true).await?;
        if cart.is_empty() {
            return Err(ErrorCode::CartIsEmpty.into());
        }

        let order_id = OrderId::new();
        sqlx::query("INSERT INTO orders (id, user_id, status) VALUES ($1, $2, $3)")
            .bind(order_id)
            .bind(user_id)
            .bind(OrderStatus::New)
            .execute(&mut *tx)
            .await
            .context("failed to insert order")
            .map_err(AppError::database)?;

        let lines: Vec<(ProductId, i32, f64)> = cart
            .iter()
            .filter(|item| !item.product.is_hidden())
            .map(|item| (item.product.id, item.count, item.product.price))
            .collect();
        if lines.len() < cart.len() {
            warn!(skipped = cart.len() - lines.len(), "Hidden products left out of order");
        }
        Self::insert_lines(&mut tx, order_id, &lines).await?;

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .context("failed to clear cart")
            .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("failed to commit order")
            .map_err(AppError::database)?;

        info!(order.id = %order_id, user.id = %user_id, lines = lines.len(), "Order created");
        Self::get_order(db, order_id).await
    }

    /// Changes the status and/or replaces the product lines.
    ///
    /// Lines can only be replaced while the order is still `new`.
    #[instrument(skip(db, request), fields(db.operation = "UPDATE", db.table = "orders"))]
    pub async fn update_order(
        db: &PgPool,
        id: OrderId,
        request: UpdateOrderRequest,
    ) -> Result<Order, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("failed to begin transaction")
            .map_err(AppError::database)?;

        let current: OrderRow = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("failed to lock order")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::from_code(ErrorCode::OrderNotExist))?;

        if let Some(requested) = &request.products {
            if current.status != OrderStatus::New {
                return Err(ErrorCode::OrderCantBeUpdated.into());
            }

            let merged = merge_lines(requested);
            let ids: Vec<ProductId> = merged.iter().map(|(id, _)| *id).collect();
            let found = sqlx::query_as::<_, PricedProduct>(
                "SELECT id, price, status FROM products WHERE id = ANY($1)",
            )
            .bind(&ids)
            .fetch_all(&mut *tx)
            .await
            .context("failed to fetch order products")
            .map_err(AppError::database)?;
            let found: HashMap<ProductId, PricedProduct> =
                found.into_iter().map(|p| (p.id, p)).collect();

            let mut lines = Vec::with_capacity(merged.len());
            for (product_id, count) in merged {
                let product = found
                    .get(&product_id)
                    .ok_or_else(|| AppError::from_code(ErrorCode::ProductNotExist))?;
                if product.status == ProductStatus::Published {
                    lines.push((product_id, count, product.price));
                }
            }

            sqlx::query("DELETE FROM order_products WHERE order_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .context("failed to clear order products")
                .map_err(AppError::database)?;
            Self::insert_lines(&mut tx, id, &lines).await?;
        }

        if let Some(status) = request.status {
            sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
                .bind(id)
                .bind(status)
                .execute(&mut *tx)
                .await
                .context("failed to update order status")
                .map_err(AppError::database)?;
        }

        tx.commit()
            .await
            .context("failed to commit order update")
            .map_err(AppError::database)?;

        info!(order.id = %id, "Order updated");
        Self::get_order(db, id).await
    }

    /// Only `new` orders can be deleted.
    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "orders"))]
    pub async fn delete_order(db: &PgPool, id: OrderId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1 AND status = $2")
            .bind(id)
            .bind(OrderStatus::New)
            .execute(db)
            .await
            .context("failed to delete order")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return match Self::find(db, id).await? {
                Some(_) => Err(ErrorCode::OrderCantBeDeleted.into()),
                None => Err(ErrorCode::OrderNotExist.into()),
            };
        }

        info!(order.id = %id, "Order deleted");
        Ok(())
    }

    async fn find(db: &PgPool, id: OrderId) -> Result<Option<Order>, AppError> {
        let Some(row) = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("failed to fetch order")
        .map_err(AppError::database)?
        else {
            return Ok(None);
        };

        let products = Self::items(db, &[row.id]).await?.remove(&row.id).unwrap_or_default();
        Ok(Some(Order::from_row(row, products)))
    }

    async fn items<'e>(
        executor: impl PgExecutor<'e>,
        order_ids: &[OrderId],
    ) -> Result<HashMap<OrderId, Vec<OrderItem>>, AppError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT op.order_id, op.product_id, p.name,
                    op.product_count AS count, op.product_price AS price
             FROM order_products op
             JOIN products p ON p.id = op.product_id
             WHERE op.order_id = ANY($1)
             ORDER BY p.name",
        )
        .bind(order_ids)
        .fetch_all(executor)
        .await
        .context("failed to fetch order products")
        .map_err(AppError::database)?;

        let mut grouped: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            grouped.entry(row.order_id).or_default().push(row.item);
        }
        Ok(grouped)
    }

    async fn insert_lines(
        tx: &mut Transaction<'_, Postgres>,
        order_id: OrderId,
        lines: &[(ProductId, i32, f64)],
    ) -> Result<(), AppError> {
        for (product_id, count, price) in lines {
            sqlx::query(
                "INSERT INTO order_products (order_id, product_id, product_count, product_price)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order_id)
            .bind(product_id)
            .bind(count)
            .bind(price)
            .execute(&mut **tx)
            .await
            .context("failed to insert order product")
            .map_err(AppError::database)?;
        }
        Ok(())
    }
}
