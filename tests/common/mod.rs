#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use fake::{Fake, faker::lorem::en::Word};
use http_body_util::BodyExt;
use printshop::{
    middleware::auth::AuthGate,
    modules::users::PgUserDirectory,
    router::init_router,
    state::AppState,
};
use printshop_auth::{
    SessionManager, UserDirectory,
    memory::{MemorySecretStore, MemoryUserDirectory},
};
use printshop_config::{AccessTable, CorsConfig, ServerConfig};
use printshop_core::CredentialHasher;
use printshop_models::{UserChanges, UserId, UserRole, UserStatus};
use serde_json::{Value, json};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "password1234";

pub struct TestApp {
    pub router: Router,
    pub sessions: Arc<SessionManager>,
    pub store: Arc<MemorySecretStore>,
}

pub fn access_table() -> AccessTable {
    AccessTable::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/config/access.json")).unwrap()
}

fn build(db: PgPool, directory: Arc<dyn UserDirectory>) -> TestApp {
    let store = Arc::new(MemorySecretStore::new());
    let sessions = Arc::new(SessionManager::new(
        directory,
        store.clone(),
        CredentialHasher::salted_sha256("test-salt"),
        Duration::from_secs(900),
        Duration::from_secs(3600),
    ));

    let server_config = ServerConfig::default();
    let gate = AuthGate::new(
        sessions.clone(),
        Arc::new(access_table()),
        server_config.base_path.as_str(),
    );

    let state = AppState {
        db,
        sessions: sessions.clone(),
        gate,
        cors_config: CorsConfig::from_list("*"),
        server_config,
        metrics: None,
    };

    TestApp {
        router: init_router(state),
        sessions,
        store,
    }
}

/// Users live in memory and the pool never connects. Only routes that stay
/// out of Postgres can be exercised.
pub fn memory_app() -> TestApp {
    let db = PgPoolOptions::new()
        .connect_lazy("postgres://printshop@localhost/unused")
        .unwrap();
    build(db, Arc::new(MemoryUserDirectory::new()))
}

pub fn pg_app(db: PgPool) -> TestApp {
    let directory = Arc::new(PgUserDirectory::new(db.clone()));
    build(db, directory)
}

pub fn unique_email() -> String {
    let word: String = Word().fake();
    format!("{}-{}@example.com", word.to_lowercase(), Uuid::new_v4().simple())
}

pub async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

pub struct Session {
    pub id: UserId,
    pub token: String,
    pub refresh_token: String,
}

pub async fn register(app: &TestApp, email: &str) -> UserId {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "first_name": "Ivan",
            "last_name": "Petrov",
            "email": email,
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    UserId(body["id"].as_str().unwrap().parse().unwrap())
}

pub async fn login(app: &TestApp, email: &str) -> (String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    (
        body["token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}

pub async fn sign_up(app: &TestApp) -> Session {
    let email = unique_email();
    let id = register(app, &email).await;
    let (token, refresh_token) = login(app, &email).await;
    Session {
        id,
        token,
        refresh_token,
    }
}

pub async fn sign_up_admin(app: &TestApp) -> Session {
    let session = sign_up(app).await;
    set_role(app, session.id, UserRole::Admin).await;
    session
}

pub async fn set_role(app: &TestApp, id: UserId, role: UserRole) {
    let changes = UserChanges {
        role: Some(role),
        ..Default::default()
    };
    app.sessions.directory().update(id, changes).await.unwrap();
}

pub async fn set_status(app: &TestApp, id: UserId, status: UserStatus) {
    let changes = UserChanges {
        status: Some(status),
        ..Default::default()
    };
    app.sessions.directory().update(id, changes).await.unwrap();
}

pub fn error_code(body: &Value) -> u64 {
    body["error"].as_u64().unwrap()
}
