mod common;

use axum::http::{Method, StatusCode};
use common::{Session, TestApp, error_code, pg_app, send, sign_up, sign_up_admin};
use serde_json::{Value, json};
use sqlx::PgPool;

struct Catalog {
    admin: Session,
    published: String,
    hidden: String,
}

async fn seed_catalog(app: &TestApp) -> Catalog {
    let admin = sign_up_admin(app).await;

    let (_, producer) = send(
        app,
        Method::POST,
        "/api/v1/producers",
        Some(&admin.token),
        Some(json!({ "name": "Epson", "description": "Inkjet printers" })),
    )
    .await;
    let producer_id = producer["id"].as_str().unwrap();

    let mut ids = Vec::new();
    for (name, status) in [("EcoTank L3250", "published"), ("WorkForce WF-2930", "hidden")] {
        let (code, product) = send(
            app,
            Method::POST,
            "/api/v1/products",
            Some(&admin.token),
            Some(json!({
                "name": name,
                "price": 100.0,
                "producer_id": producer_id,
                "status": status,
            })),
        )
        .await;
        assert_eq!(code, StatusCode::CREATED, "{product}");
        ids.push(product["id"].as_str().unwrap().to_string());
    }

    let hidden = ids.pop().unwrap();
    let published = ids.pop().unwrap();
    Catalog {
        admin,
        published,
        hidden,
    }
}

async fn put_in_cart(app: &TestApp, token: &str, product_id: &str, count: i32) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/api/v1/cart",
        Some(token),
        Some(json!({ "product_id": product_id, "count": count })),
    )
    .await
}

async fn place_order(app: &TestApp, token: &str) -> (StatusCode, Value) {
    send(app, Method::POST, "/api/v1/orders", Some(token), None).await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cart_set_and_remove(pool: PgPool) {
    let app = pg_app(pool);
    let catalog = seed_catalog(&app).await;
    let customer = sign_up(&app).await;

    let (status, body) = put_in_cart(&app, &customer.token, &catalog.published, 2).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["count"], 2);

    let (_, body) = put_in_cart(&app, &customer.token, &catalog.published, 5).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["count"], 5);

    let (_, body) = put_in_cart(&app, &customer.token, &catalog.published, 0).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_hidden_product_cannot_be_added_to_cart(pool: PgPool) {
    let app = pg_app(pool);
    let catalog = seed_catalog(&app).await;
    let customer = sign_up(&app).await;

    let (status, body) = put_in_cart(&app, &customer.token, &catalog.hidden, 1).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), 14);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_empty_cart_cannot_be_ordered(pool: PgPool) {
    let app = pg_app(pool);
    let customer = sign_up(&app).await;

    let (status, body) = place_order(&app, &customer.token).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), 16);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_order_captures_cart_and_clears_it(pool: PgPool) {
    let app = pg_app(pool);
    let catalog = seed_catalog(&app).await;
    let customer = sign_up(&app).await;
    put_in_cart(&app, &customer.token, &catalog.published, 3).await;

    let (status, order) = place_order(&app, &customer.token).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "new");
    assert_eq!(order["user_id"], customer.id.to_string());
    assert_eq!(order["products"][0]["count"], 3);
    assert_eq!(order["products"][0]["price"], 100.0);

    let (_, cart) = send(&app, Method::GET, "/api/v1/cart", Some(&customer.token), None).await;
    assert!(cart.as_array().unwrap().is_empty());

    // Later price changes do not touch the order.
    send(
        &app,
        Method::PUT,
        &format!("/api/v1/products/{}", catalog.published),
        Some(&catalog.admin.token),
        Some(json!({ "price": 250.0 })),
    )
    .await;

    let uri = format!("/api/v1/orders/{}", order["id"].as_str().unwrap());
    let (status, fetched) = send(&app, Method::GET, &uri, Some(&customer.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["products"][0]["price"], 100.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_customers_only_see_their_own_orders(pool: PgPool) {
    let app = pg_app(pool);
    let catalog = seed_catalog(&app).await;
    let alice = sign_up(&app).await;
    let bob = sign_up(&app).await;

    put_in_cart(&app, &alice.token, &catalog.published, 1).await;
    let (_, order) = place_order(&app, &alice.token).await;
    let uri = format!("/api/v1/orders/{}", order["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::GET, &uri, Some(&bob.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), 6);

    let (_, listed) = send(&app, Method::GET, "/api/v1/orders", Some(&bob.token), None).await;
    assert!(listed.as_array().unwrap().is_empty());

    let foreign = format!("/api/v1/orders?user_id={}", alice.id);
    let (status, _) = send(&app, Method::GET, &foreign, Some(&bob.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, listed) = send(&app, Method::GET, &foreign, Some(&catalog.admin.token), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_updates_order(pool: PgPool) {
    let app = pg_app(pool);
    let catalog = seed_catalog(&app).await;
    let customer = sign_up(&app).await;
    put_in_cart(&app, &customer.token, &catalog.published, 1).await;
    let (_, order) = place_order(&app, &customer.token).await;
    let uri = format!("/api/v1/orders/{}", order["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&customer.token),
        Some(json!({ "status": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Duplicate lines are merged and hidden products dropped.
    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&catalog.admin.token),
        Some(json!({
            "products": [
                { "id": catalog.published, "count": 2 },
                { "id": catalog.published, "count": 1 },
                { "id": catalog.hidden, "count": 4 },
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    let products = updated["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["count"], 3);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&catalog.admin.token),
        Some(json!({ "status": "in_progress" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "in_progress");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&catalog.admin.token),
        Some(json!({ "products": [{ "id": catalog.published, "count": 1 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), 18);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_only_new_orders_can_be_deleted(pool: PgPool) {
    let app = pg_app(pool);
    let catalog = seed_catalog(&app).await;
    let customer = sign_up(&app).await;

    put_in_cart(&app, &customer.token, &catalog.published, 1).await;
    let (_, first) = place_order(&app, &customer.token).await;
    put_in_cart(&app, &customer.token, &catalog.published, 1).await;
    let (_, second) = place_order(&app, &customer.token).await;

    let first_uri = format!("/api/v1/orders/{}", first["id"].as_str().unwrap());
    let (status, _) = send(&app, Method::DELETE, &first_uri, Some(&customer.token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::DELETE, &first_uri, Some(&customer.token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), 19);

    let second_uri = format!("/api/v1/orders/{}", second["id"].as_str().unwrap());
    send(
        &app,
        Method::PUT,
        &second_uri,
        Some(&catalog.admin.token),
        Some(json!({ "status": "done" })),
    )
    .await;

    let (status, body) = send(&app, Method::DELETE, &second_uri, Some(&customer.token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), 17);
}
