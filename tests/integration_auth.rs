mod common;

use axum::http::{Method, StatusCode};
use common::{PASSWORD, error_code, login, pg_app, register, send, set_status, sign_up, unique_email};
use printshop_auth::TokenPurpose;
use printshop_models::UserStatus;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_register_creates_active_customer(pool: PgPool) {
    let app = pg_app(pool.clone());
    let email = unique_email();

    let (status, body) = send(
        &app,
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

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], email);
    assert_eq!(body["role"], "customer");
    assert_eq!(body["status"], "active");
    assert!(body.get("password_hash").is_none());

    let stored: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_ne!(stored, PASSWORD);
    assert_eq!(stored.len(), 64);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_duplicate_email(pool: PgPool) {
    let app = pg_app(pool);
    let email = unique_email();
    register(&app, &email).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "first_name": "Other",
            "last_name": "Person",
            "email": email,
            "password": "anotherpass1",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), 9);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_validation_error(pool: PgPool) {
    let app = pg_app(pool);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "first_name": "Iv",
            "last_name": "Petrov",
            "email": "not-an-email",
            "password": "short",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), 8);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_malformed_body(pool: PgPool) {
    let app = pg_app(pool);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "email": 42 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), 7);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password_and_unknown_email_look_the_same(pool: PgPool) {
    let app = pg_app(pool);
    let email = unique_email();
    register(&app, &email).await;

    let (status, wrong_password) = send(
        &app,
        Method::POST,
        "/api/v1/auth",
        None,
        Some(json!({ "email": email, "password": "wrongpass123" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, unknown_email) = send(
        &app,
        Method::POST,
        "/api/v1/auth",
        None,
        Some(json!({ "email": unique_email(), "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(error_code(&wrong_password), 11);
    assert_eq!(wrong_password, unknown_email);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_blocked_user_cannot_login(pool: PgPool) {
    let app = pg_app(pool);
    let email = unique_email();
    let id = register(&app, &email).await;
    set_status(&app, id, UserStatus::Blocked).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), 13);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_second_login_revokes_first_session(pool: PgPool) {
    let app = pg_app(pool);
    let email = unique_email();
    register(&app, &email).await;

    let (first, _) = login(&app, &email).await;
    let (second, _) = login(&app, &email).await;

    let (status, _) = send(&app, Method::GET, "/api/v1/profile", Some(&first), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/v1/profile", Some(&second), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_rotates_pair(pool: PgPool) {
    let app = pg_app(pool);
    let session = sign_up(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/refresh-tokens",
        None,
        Some(json!({ "refresh_token": session.refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_token = body["token"].as_str().unwrap().to_string();

    let (status, _) = send(&app, Method::GET, "/api/v1/profile", Some(&session.token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/v1/profile", Some(&new_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/refresh-tokens",
        None,
        Some(json!({ "refresh_token": session.refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_access_token_cannot_refresh(pool: PgPool) {
    let app = pg_app(pool);
    let session = sign_up(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/refresh-tokens",
        None,
        Some(json!({ "refresh_token": session.token })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), 2);
    assert!(app.store.current(session.id, TokenPurpose::Refresh).await.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_profile_update_rehashes_password(pool: PgPool) {
    let app = pg_app(pool);
    let email = unique_email();
    register(&app, &email).await;
    let (token, _) = login(&app, &email).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/profile",
        Some(&token),
        Some(json!({ "first_name": "Vanya", "password": "newpassword99" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Vanya");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth",
        None,
        Some(json!({ "email": email, "password": "newpassword99" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
