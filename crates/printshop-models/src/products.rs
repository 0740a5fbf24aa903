//! Catalog product models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{ProducerId, ProductId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Published,
    Hidden,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub producer_id: ProducerId,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn is_hidden(&self) -> bool {
        self.status == ProductStatus::Hidden
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 3, max = 100))]
    #[schema(example = "EcoTank L3250")]
    pub name: String,
    #[validate(range(exclusive_min = 0.0))]
    #[schema(example = 189.99)]
    pub price: f64,
    pub producer_id: ProducerId,
    pub status: ProductStatus,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 3, max = 100))]
    pub name: Option<String>,
    #[validate(range(exclusive_min = 0.0))]
    pub price: Option<f64>,
    pub producer_id: Option<ProducerId>,
    pub status: Option<ProductStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilterParams {
    #[param(value_type = Option<String>, format = "uuid")]
    pub producer_id: Option<ProducerId>,
}
