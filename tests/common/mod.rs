//! Shared helpers for integration tests: an in-memory database migrated
//! with the real migrator, the real router, and small request helpers.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test_secret_key_minimum_32_characters_long";

pub async fn setup_test_db() -> SqlitePool {
    // One connection: every handle must see the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    pool
}

pub async fn create_test_app() -> (Router, SqlitePool) {
    let pool = setup_test_db().await;
    let app = tastebook::create_app(pool.clone(), JWT_SECRET);
    (app, pool)
}

/// Fire one request at the router and return (status, raw body bytes).
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Token {token}"));
    }

    let request = match body {
        Some(value) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, bytes.to_vec())
}

/// Like [`send_raw`] but parses the body as JSON (Null for empty bodies).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, method, uri, token, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Register a user through the API and return (user_id, auth token).
pub async fn register_and_login(app: &Router, email: &str, username: &str) -> (i64, String) {
    let (status, body) = send(
        app,
        "POST",
        "/users/",
        None,
        Some(json!({
            "email": email,
            "username": username,
            "first_name": "Test",
            "last_name": "User",
            "password": "correct horse battery",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    let user_id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        app,
        "POST",
        "/auth/token/login/",
        None,
        Some(json!({ "email": email, "password": "correct horse battery" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");

    (user_id, body["auth_token"].as_str().unwrap().to_string())
}

pub async fn seed_tag(pool: &SqlitePool, name: &str, color: &str, slug: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO tags (name, color, slug) VALUES (?1, ?2, ?3) RETURNING id")
        .bind(name)
        .bind(color)
        .bind(slug)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn seed_ingredient(pool: &SqlitePool, name: &str, unit: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO ingredients (name, measurement_unit) VALUES (?1, ?2) RETURNING id",
    )
    .bind(name)
    .bind(unit)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Create a recipe through the API. `ingredients` holds (id, amount) pairs.
pub async fn create_recipe(
    app: &Router,
    token: &str,
    name: &str,
    ingredients: &[(i64, i64)],
    tags: &[i64],
) -> i64 {
    let lines: Vec<Value> = ingredients
        .iter()
        .map(|(id, amount)| json!({ "id": id, "amount": amount }))
        .collect();

    let (status, body) = send(
        app,
        "POST",
        "/recipes/",
        Some(token),
        Some(json!({
            "ingredients": lines,
            "tags": tags,
            "name": name,
            "text": "Mix everything and cook.",
            "cooking_time": 30,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create recipe failed: {body}");

    body["id"].as_i64().unwrap()
}
