use axum::{Json, extract::State, http::StatusCode};
use printshop_auth::AuthError;
use printshop_core::{AppError, ErrorCode};
use printshop_models::{LoginRequest, RefreshTokenRequest, RegisterRequest, TokenPair, User};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::CurrentUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Error body returned by every endpoint.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Stable numeric error code.
    pub error: u16,
    pub message: String,
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access and refresh tokens", body = TokenPair),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Wrong email or password (code 11) or user is blocked (code 13)", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, request), fields(user.email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let pair = state
        .sessions
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(pair))
}

/// Register a customer account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = User),
        (status = 400, description = "Validation error or email already exists (code 9)", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, request), fields(user.email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<Json<User>, AppError> {
    let user = state.sessions.register(request).await?;
    printshop_observability::track_user_registered();
    Ok(Json(user))
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh-tokens",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Rotated access and refresh tokens", body = TokenPair),
        (status = 401, description = "Invalid refresh token (code 2)", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn refresh_tokens(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let pair = state
        .sessions
        .refresh_token(&request.refresh_token)
        .await
        .map_err(|e| match e {
            AuthError::InvalidToken => AppError::from_code(ErrorCode::InvalidRefreshToken),
            other => other.into(),
        })?;
    Ok(Json(pair))
}

/// Revoke both tokens of the signed-in user
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Tokens revoked"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current_user), fields(user.id = %current_user.id()))]
pub async fn logout(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<StatusCode, AppError> {
    state.sessions.logout(current_user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
