use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use printshop_core::{AppError, ErrorCode};
use printshop_models::{
    OrderId,
    orders::{Order, OrderFilterParams, UpdateOrderRequest},
};
use tracing::{instrument, warn};

use crate::middleware::auth::CurrentUser;
use crate::state::AppState;
use crate::validator::{QueryParams, ValidatedJson};

use super::service::OrderService;

/// Admins see everything; anyone else only their own orders.
fn ensure_owner(current_user: &CurrentUser, order: &Order) -> Result<(), AppError> {
    if current_user.is_admin() || order.user_id == current_user.id() {
        Ok(())
    } else {
        warn!(order.id = %order.id, user.id = %current_user.id(), "Order belongs to another user");
        Err(AppError::forbidden())
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(OrderFilterParams),
    responses(
        (status = 200, description = "Orders visible to the caller", body = Vec<Order>),
        (status = 403, description = "Filtering by another user's id as a non-admin")
    ),
    tag = "Orders",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current_user), fields(user.id = %current_user.id()))]
pub async fn list_orders(
    State(state): State<AppState>,
    current_user: CurrentUser,
    QueryParams(mut filters): QueryParams<OrderFilterParams>,
) -> Result<Json<Vec<Order>>, AppError> {
    if !current_user.is_admin() {
        if filters.user_id.is_some_and(|id| id != current_user.id()) {
            return Err(AppError::forbidden());
        }
        filters.user_id = Some(current_user.id());
    }

    Ok(Json(OrderService::list_orders(&state.db, filters).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders",
    responses(
        (status = 201, description = "Order created from the cart", body = Order),
        (status = 400, description = "Cart is empty (code 16)")
    ),
    tag = "Orders",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current_user), fields(user.id = %current_user.id()))]
pub async fn create_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = OrderService::create_order(&state.db, current_user.id()).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = OrderId, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order details", body = Order),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Order not found")
    ),
    tag = "Orders",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current_user), fields(user.id = %current_user.id()))]
pub async fn get_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>, AppError> {
    let order = OrderService::get_order(&state.db, id).await?;
    ensure_owner(&current_user, &order)?;
    Ok(Json(order))
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}",
    params(("id" = OrderId, Path, description = "Order ID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 400, description = "Order or product missing (codes 19, 14) or not new (code 18)"),
        (status = 403, description = "Admin only")
    ),
    tag = "Orders",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, request))]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    ValidatedJson(request): ValidatedJson<UpdateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(OrderService::update_order(&state.db, id, request).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    params(("id" = OrderId, Path, description = "Order ID")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 400, description = "Order missing (code 19) or no longer new (code 17)"),
        (status = 403, description = "Order belongs to another user")
    ),
    tag = "Orders",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current_user), fields(user.id = %current_user.id()))]
pub async fn delete_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<OrderId>,
) -> Result<StatusCode, AppError> {
    if !current_user.is_admin() {
        let order = OrderService::get_order(&state.db, id)
            .await
            .map_err(|e| match e.code {
                ErrorCode::ResourceNotFound => AppError::from_code(ErrorCode::OrderNotExist),
                _ => e,
            })?;
        ensure_owner(&current_user, &order)?;
    }

    OrderService::delete_order(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
