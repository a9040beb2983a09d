//! Web API Authentication Tests
//!
//! Integration tests for signup, signin, the session cookie and user routes.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{admin_token, signin, signup, spawn_app, user_token, ADMIN_EMAIL};

// ============================================================================
// Signup
// ============================================================================

#[tokio::test]
async fn test_signup_success() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/users/auth/signup")
        .json(&json!({
            "email": "jane@example.com",
            "password": "secret1",
            "name": "Jane"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["data"]["email"], "jane@example.com");
    assert_eq!(body["data"]["name"], "Jane");
    assert_eq!(body["data"]["role"], "USER");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["createdAt"].is_string());
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
async fn test_signup_ignores_requested_role() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/users/auth/signup")
        .json(&json!({
            "email": "sneaky@example.com",
            "password": "secret1",
            "name": "Sneaky",
            "role": "ADMIN"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["data"]["role"], "USER");
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let app = spawn_app().await;
    signup(&app.server, "jane@example.com", "secret1", "Jane").await;

    let response = app
        .server
        .post("/users/auth/signup")
        .json(&json!({
            "email": "jane@example.com",
            "password": "other-secret",
            "name": "Other Jane"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_signup_validation_errors() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/users/auth/signup")
        .json(&json!({
            "email": "not-an-email",
            "password": "123",
            "name": ""
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let details = &body["error"]["details"];
    assert!(details["email"].is_array());
    assert!(details["password"].is_array());
    assert!(details["name"].is_array());
}

#[tokio::test]
async fn test_signup_blank_name_rejected() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/users/auth/signup")
        .json(&json!({
            "email": "blank@example.com",
            "password": "secret1",
            "name": "   "
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// Signin / logout / me
// ============================================================================

#[tokio::test]
async fn test_signin_sets_cookie() {
    let app = spawn_app().await;
    signup(&app.server, "jane@example.com", "secret1", "Jane").await;

    let response = app
        .server
        .post("/users/auth/signin")
        .json(&json!({ "email": "jane@example.com", "password": "secret1" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["data"]["access_token"].is_string());
    assert!(body["data"]["message"].is_string());

    let cookie = response.cookie("access_token");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.value(), body["data"]["access_token"].as_str().unwrap());
}

#[tokio::test]
async fn test_signin_wrong_password_and_unknown_email_match() {
    let app = spawn_app().await;
    signup(&app.server, "jane@example.com", "secret1", "Jane").await;

    let wrong = app
        .server
        .post("/users/auth/signin")
        .json(&json!({ "email": "jane@example.com", "password": "wrong-password" }))
        .await;
    wrong.assert_status(StatusCode::FORBIDDEN);

    let unknown = app
        .server
        .post("/users/auth/signin")
        .json(&json!({ "email": "nobody@example.com", "password": "secret1" }))
        .await;
    unknown.assert_status(StatusCode::FORBIDDEN);

    let wrong: Value = wrong.json();
    let unknown: Value = unknown.json();
    assert_eq!(wrong["error"]["message"], "Invalid credentials");
    assert_eq!(wrong["error"]["message"], unknown["error"]["message"]);
}

#[tokio::test]
async fn test_me_with_cookie() {
    let app = spawn_app().await;
    signup(&app.server, "jane@example.com", "secret1", "Jane").await;

    let signin_response = app
        .server
        .post("/users/auth/signin")
        .json(&json!({ "email": "jane@example.com", "password": "secret1" }))
        .await;
    let cookie = signin_response.cookie("access_token");

    let response = app.server.get("/users/auth/me").add_cookie(cookie).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["email"], "jane@example.com");
}

#[tokio::test]
async fn test_me_with_bearer() {
    let app = spawn_app().await;
    let token = admin_token(&app.server).await;

    let response = app
        .server
        .get("/users/auth/me")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["email"], ADMIN_EMAIL);
    assert_eq!(body["data"]["role"], "ADMIN");
}

#[tokio::test]
async fn test_me_unauthorized() {
    let app = spawn_app().await;

    app.server
        .get("/users/auth/me")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    app.server
        .get("/users/auth/me")
        .add_header(AUTHORIZATION, "Bearer not-a-jwt")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_after_account_deleted() {
    let app = spawn_app().await;
    let admin = admin_token(&app.server).await;
    let (id, token) = user_token(&app.server, "gone@example.com", "secret1").await;

    app.server
        .delete(&format!("/users/{}", id))
        .add_header(AUTHORIZATION, format!("Bearer {}", admin))
        .await
        .assert_status_ok();

    app.server
        .get("/users/auth/me")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = spawn_app().await;

    signup(&app.server, "jane@example.com", "secret1", "Jane").await;
    let signin_response = app
        .server
        .post("/users/auth/signin")
        .json(&json!({ "email": "jane@example.com", "password": "secret1" }))
        .await;
    let session = signin_response.cookie("access_token");

    let response = app
        .server
        .post("/users/auth/logout")
        .add_cookie(session)
        .await;

    response.assert_status_ok();
    let cookie = response.cookie("access_token");
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    let body: Value = response.json();
    assert!(body["data"]["message"].is_string());
}

#[tokio::test]
async fn test_logout_without_cookie_still_expires_it() {
    let app = spawn_app().await;

    let response = app.server.post("/users/auth/logout").await;

    response.assert_status_ok();
    let cookie = response.cookie("access_token");
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_list_users() {
    let app = spawn_app().await;
    let (_, token) = user_token(&app.server, "jane@example.com", "secret1").await;

    let response = app
        .server
        .get("/users")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password").is_none()));
}

#[tokio::test]
async fn test_list_users_requires_auth() {
    let app = spawn_app().await;
    app.server
        .get("/users")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_user_requires_admin() {
    let app = spawn_app().await;
    let (id, token) = user_token(&app.server, "jane@example.com", "secret1").await;

    let response = app
        .server
        .delete(&format!("/users/{}", id))
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_user_as_admin() {
    let app = spawn_app().await;
    let admin = admin_token(&app.server).await;
    let (id, _) = user_token(&app.server, "jane@example.com", "secret1").await;

    let response = app
        .server
        .delete(&format!("/users/{}", id))
        .add_header(AUTHORIZATION, format!("Bearer {}", admin))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["id"], id.as_str());

    let missing = app
        .server
        .delete(&format!("/users/{}", id))
        .add_header(AUTHORIZATION, format!("Bearer {}", admin))
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user_malformed_id() {
    let app = spawn_app().await;
    let admin = admin_token(&app.server).await;

    app.server
        .delete("/users/42")
        .add_header(AUTHORIZATION, format!("Bearer {}", admin))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signin_helper_token_works() {
    let app = spawn_app().await;
    signup(&app.server, "jane@example.com", "secret1", "Jane").await;
    let token = signin(&app.server, "jane@example.com", "secret1").await;
    assert_eq!(token.split('.').count(), 3);
}
