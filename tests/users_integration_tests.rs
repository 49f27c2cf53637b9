//! Registration, login, profile and password-change flows.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

#[tokio::test]
async fn register_returns_profile_without_password() {
    let (app, _pool) = create_test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/users/",
        None,
        Some(json!({
            "email": "vasya@example.com",
            "username": "vasya.pupkin",
            "first_name": "Vasya",
            "last_name": "Pupkin",
            "password": "s3cret-enough",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["email"], "vasya@example.com");
    assert_eq!(body["username"], "vasya.pupkin");
    assert_eq!(body["first_name"], "Vasya");
    assert!(body["id"].as_i64().is_some());
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn register_rejects_bad_input() {
    let (app, _pool) = create_test_app().await;

    // Invalid email.
    let (status, _) = send(
        &app,
        "POST",
        "/users/",
        None,
        Some(json!({
            "email": "not-an-email",
            "username": "someone",
            "first_name": "A",
            "last_name": "B",
            "password": "s3cret-enough",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Username with forbidden characters.
    let (status, _) = send(
        &app,
        "POST",
        "/users/",
        None,
        Some(json!({
            "email": "someone@example.com",
            "username": "bad name!",
            "first_name": "A",
            "last_name": "B",
            "password": "s3cret-enough",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Password too short.
    let (status, _) = send(
        &app,
        "POST",
        "/users/",
        None,
        Some(json!({
            "email": "someone@example.com",
            "username": "someone",
            "first_name": "A",
            "last_name": "B",
            "password": "short",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_rejects_duplicate_email_and_username() {
    let (app, _pool) = create_test_app().await;
    register_and_login(&app, "taken@example.com", "taken").await;

    let (status, _) = send(
        &app,
        "POST",
        "/users/",
        None,
        Some(json!({
            "email": "taken@example.com",
            "username": "fresh",
            "first_name": "A",
            "last_name": "B",
            "password": "s3cret-enough",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/users/",
        None,
        Some(json!({
            "email": "fresh@example.com",
            "username": "taken",
            "first_name": "A",
            "last_name": "B",
            "password": "s3cret-enough",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_with_wrong_password_fails() {
    let (app, _pool) = create_test_app().await;
    register_and_login(&app, "user@example.com", "user").await;

    let (status, _) = send(
        &app,
        "POST",
        "/auth/token/login/",
        None,
        Some(json!({ "email": "user@example.com", "password": "wrong password" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown account gets the same answer as a wrong password.
    let (status, _) = send(
        &app,
        "POST",
        "/auth/token/login/",
        None,
        Some(json!({ "email": "ghost@example.com", "password": "whatever!" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_requires_token_and_returns_no_content() {
    let (app, _pool) = create_test_app().await;
    let (_, token) = register_and_login(&app, "user@example.com", "user").await;

    let (status, _) = send(&app, "POST", "/auth/token/logout/", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "POST", "/auth/token/logout/", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_reflects_the_token_owner() {
    let (app, _pool) = create_test_app().await;
    let (user_id, token) = register_and_login(&app, "me@example.com", "me_user").await;

    let (status, body) = send(&app, "GET", "/users/me/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_i64().unwrap(), user_id);
    assert_eq!(body["email"], "me@example.com");
    assert_eq!(body["is_subscribed"], json!(false));

    let (status, _) = send(&app, "GET", "/users/me/", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/users/me/", Some("garbage.token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_detail_and_listing_are_public() {
    let (app, _pool) = create_test_app().await;
    let (user_id, _) = register_and_login(&app, "public@example.com", "public").await;

    let (status, body) = send(&app, "GET", &format!("/users/{user_id}/"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "public");

    let (status, _) = send(&app, "GET", "/users/424242/", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/users/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"].as_i64().unwrap(), 1);
    assert_eq!(body["results"][0]["username"], "public");
    assert_eq!(body["next"], serde_json::Value::Null);
}

#[tokio::test]
async fn set_password_verifies_the_current_one() {
    let (app, _pool) = create_test_app().await;
    let (_, token) = register_and_login(&app, "user@example.com", "user").await;

    let (status, _) = send(
        &app,
        "POST",
        "/users/set_password/",
        Some(&token),
        Some(json!({
            "current_password": "not the real one",
            "new_password": "another-long-secret",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/users/set_password/",
        Some(&token),
        Some(json!({
            "current_password": "correct horse battery",
            "new_password": "another-long-secret",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Old password no longer works, the new one does.
    let (status, _) = send(
        &app,
        "POST",
        "/auth/token/login/",
        None,
        Some(json!({ "email": "user@example.com", "password": "correct horse battery" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/token/login/",
        None,
        Some(json!({ "email": "user@example.com", "password": "another-long-secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
