use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{login, logout, refresh_tokens, register};

/// Login, registration and refresh. These run without the gate.
pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/", post(login))
        .route("/register", post(register))
        .route("/refresh-tokens", post(refresh_tokens))
}

/// Routes under `/auth` that need a signed-in caller, merged behind the gate.
pub fn init_auth_gated_router() -> Router<AppState> {
    Router::new().route("/auth/logout", post(logout))
}
