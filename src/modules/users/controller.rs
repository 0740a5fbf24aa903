use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use printshop_core::AppError;
use printshop_models::{
    RegisterRequest, User, UserId,
    users::{UpdateProfileRequest, UpdateUserRequest, UserFilterParams},
};
use tracing::instrument;

use crate::middleware::auth::CurrentUser;
use crate::state::AppState;
use crate::validator::{QueryParams, ValidatedJson};

use super::service::UserService;

#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "The signed-in user", body = User),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current_user), fields(user.id = %current_user.id()))]
pub async fn get_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user(&state.sessions, current_user.id()).await?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current_user, request), fields(user.id = %current_user.id()))]
pub async fn update_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    let user = UserService::update_profile(&state.sessions, current_user.id(), request).await?;
    Ok(Json(user))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(UserFilterParams),
    responses(
        (status = 200, description = "Users matching the filters", body = Vec<User>),
        (status = 403, description = "Admin only")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(filters): QueryParams<UserFilterParams>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = UserService::list_users(&state.db, filters).await?;
    Ok(Json(users))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Validation error or email already exists"),
        (status = 403, description = "Admin only")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, request), fields(user.email = %request.email))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = state.sessions.register(request).await?;
    printshop_observability::track_user_registered();
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = UserId, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user(&state.sessions, id).await?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = UserId, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, request))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    let user = UserService::update_user(&state.sessions, id, request).await?;
    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = UserId, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted and signed out"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<StatusCode, AppError> {
    UserService::delete_user(&state.db, &state.sessions, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
