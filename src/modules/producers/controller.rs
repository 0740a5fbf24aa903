use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use printshop_core::AppError;
use printshop_models::{
    ProducerId,
    producers::{CreateProducerRequest, Producer, UpdateProducerRequest},
};
use tracing::instrument;

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::ProducerService;

#[utoipa::path(
    get,
    path = "/api/v1/producers",
    responses((status = 200, description = "All producers", body = Vec<Producer>)),
    tag = "Producers"
)]
#[instrument(skip(state))]
pub async fn list_producers(State(state): State<AppState>) -> Result<Json<Vec<Producer>>, AppError> {
    Ok(Json(ProducerService::list_producers(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/producers/{id}",
    params(("id" = ProducerId, Path, description = "Producer ID")),
    responses(
        (status = 200, description = "Producer details", body = Producer),
        (status = 404, description = "Producer not found")
    ),
    tag = "Producers"
)]
#[instrument(skip(state))]
pub async fn get_producer(
    State(state): State<AppState>,
    Path(id): Path<ProducerId>,
) -> Result<Json<Producer>, AppError> {
    Ok(Json(ProducerService::get_producer(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/producers",
    request_body = CreateProducerRequest,
    responses(
        (status = 201, description = "Producer created", body = Producer),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin only")
    ),
    tag = "Producers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, request))]
pub async fn create_producer(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateProducerRequest>,
) -> Result<(StatusCode, Json<Producer>), AppError> {
    let producer = ProducerService::create_producer(&state.db, request).await?;
    Ok((StatusCode::CREATED, Json(producer)))
}

#[utoipa::path(
    put,
    path = "/api/v1/producers/{id}",
    params(("id" = ProducerId, Path, description = "Producer ID")),
    request_body = UpdateProducerRequest,
    responses(
        (status = 200, description = "Producer updated", body = Producer),
        (status = 404, description = "Producer not found")
    ),
    tag = "Producers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, request))]
pub async fn update_producer(
    State(state): State<AppState>,
    Path(id): Path<ProducerId>,
    ValidatedJson(request): ValidatedJson<UpdateProducerRequest>,
) -> Result<Json<Producer>, AppError> {
    Ok(Json(ProducerService::update_producer(&state.db, id, request).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/producers/{id}",
    params(("id" = ProducerId, Path, description = "Producer ID")),
    responses(
        (status = 204, description = "Producer deleted"),
        (status = 400, description = "Producer still has products (code 12)"),
        (status = 404, description = "Producer not found")
    ),
    tag = "Producers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_producer(
    State(state): State<AppState>,
    Path(id): Path<ProducerId>,
) -> Result<StatusCode, AppError> {
    ProducerService::delete_producer(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
