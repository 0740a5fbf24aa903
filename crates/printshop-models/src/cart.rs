//! Shopping cart models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::ProductId;
use crate::products::Product;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct CartItem {
    #[sqlx(flatten)]
    pub product: Product,
    pub count: i32,
}

/// Sets the quantity of a product in the caller's cart. A count of zero removes it.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[validate(range(min = 0))]
    pub count: i32,
}
