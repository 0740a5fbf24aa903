use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use printshop_observability::{logging_middleware, metrics_middleware, render_metrics};
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::middleware::auth::authorize;
use crate::modules::{
    auth::{init_auth_gated_router, init_auth_router},
    cart::init_cart_router,
    orders::init_orders_router,
    producers::init_producers_router,
    products::init_products_router,
    users::{init_profile_router, init_users_router},
};
use crate::state::AppState;

async fn health() -> Json<Value> {
    Json(json!({ "health": "true" }))
}

async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => render_metrics(handle).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let origins = &state.cors_config.allowed_origins;

    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

/// API routes relative to the base path.
///
/// Everything except login, registration and refresh passes through the
/// Authorization Gate.
pub fn api_router(state: &AppState) -> Router<AppState> {
    let gated = Router::new()
        .merge(init_auth_gated_router())
        .nest("/profile", init_profile_router())
        .nest("/users", init_users_router())
        .nest("/producers", init_producers_router())
        .nest("/products", init_products_router())
        .nest("/cart", init_cart_router())
        .nest("/orders", init_orders_router())
        .route_layer(middleware::from_fn_with_state(state.gate.clone(), authorize));

    gated.nest("/auth", init_auth_router())
}

pub fn init_router(state: AppState) -> Router {
    let base_path = state.server_config.base_path.clone();
    let api = api_router(&state);

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health))
        .route("/metrics", get(metrics));

    // axum cannot nest at the root.
    let router = match base_path.as_str() {
        "" | "/" => router.merge(api),
        prefix => router.nest(prefix, api),
    };

    router
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
