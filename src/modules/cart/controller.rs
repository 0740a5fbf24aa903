use axum::{Json, extract::State};
use printshop_core::AppError;
use printshop_models::cart::{AddToCartRequest, CartItem};
use tracing::instrument;

use crate::middleware::auth::CurrentUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::CartService;

#[utoipa::path(
    get,
    path = "/api/v1/cart",
    responses(
        (status = 200, description = "Products in the caller's cart", body = Vec<CartItem>),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Cart",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current_user), fields(user.id = %current_user.id()))]
pub async fn get_cart(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<Vec<CartItem>>, AppError> {
    Ok(Json(CartService::get_cart(&state.db, current_user.id()).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Updated cart", body = Vec<CartItem>),
        (status = 400, description = "Validation error or unknown/hidden product (code 14)"),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Cart",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current_user, request), fields(user.id = %current_user.id()))]
pub async fn set_cart_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(request): ValidatedJson<AddToCartRequest>,
) -> Result<Json<Vec<CartItem>>, AppError> {
    Ok(Json(
        CartService::set_item(&state.db, current_user.id(), request).await?,
    ))
}
