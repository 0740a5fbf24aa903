use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use printshop_core::AppError;
use printshop_models::{
    ProductId,
    products::{CreateProductRequest, Product, ProductFilterParams, UpdateProductRequest},
};
use tracing::instrument;

use crate::middleware::auth::RequestContext;
use crate::state::AppState;
use crate::validator::{QueryParams, ValidatedJson};

use super::service::ProductService;

#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ProductFilterParams),
    responses((status = 200, description = "Products visible to the caller", body = Vec<Product>)),
    tag = "Products"
)]
#[instrument(skip(state, ctx))]
pub async fn list_products(
    State(state): State<AppState>,
    ctx: RequestContext,
    QueryParams(filters): QueryParams<ProductFilterParams>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = ProductService::list_products(&state.db, filters, ctx.is_admin()).await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = ProductId, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product details", body = Product),
        (status = 404, description = "Product not found or hidden")
    ),
    tag = "Products"
)]
#[instrument(skip(state, ctx))]
pub async fn get_product(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, AppError> {
    let product = ProductService::get_product(&state.db, id, ctx.is_admin()).await?;
    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error or unknown producer (code 10)"),
        (status = 403, description = "Admin only")
    ),
    tag = "Products",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, request))]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = ProductService::create_product(&state.db, request).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = ProductId, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation error or unknown producer (code 10)"),
        (status = 404, description = "Product not found")
    ),
    tag = "Products",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, request))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    ValidatedJson(request): ValidatedJson<UpdateProductRequest>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(ProductService::update_product(&state.db, id, request).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = ProductId, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, description = "Product is in a cart or an order (code 15)"),
        (status = 404, description = "Product not found")
    ),
    tag = "Products",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, AppError> {
    ProductService::delete_product(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
