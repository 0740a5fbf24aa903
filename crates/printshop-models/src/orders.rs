//! Order models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{OrderId, ProductId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    InProgress,
    Done,
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// A product line inside an order, with the price captured when it was added.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub count: i32,
    pub price: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub products: Vec<OrderItem>,
}

impl Order {
    pub fn from_row(row: OrderRow, products: Vec<OrderItem>) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            status: row.status,
            created_at: row.created_at,
            products,
        }
    }

    pub fn total(&self) -> f64 {
        self.products
            .iter()
            .map(|item| item.price * f64::from(item.count))
            .sum()
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderFilterParams {
    #[param(value_type = Option<String>, format = "uuid")]
    pub user_id: Option<UserId>,
    pub order_status: Option<OrderStatus>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct OrderProductRequest {
    pub id: ProductId,
    #[validate(range(min = 1))]
    pub count: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    #[validate(nested)]
    pub products: Option<Vec<OrderProductRequest>>,
}
