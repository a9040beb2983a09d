//! Shared helpers for the gateway integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use serde_json::{json, Value};

use anonce::config::{AdminConfig, VotingConfig};
use anonce::web::{create_router, AppState, JwtState};
use anonce::{Database, RpcServer, UserService, VoteClient};

/// JWT secret shared by every test server.
pub const JWT_SECRET: &str = "test-secret-key-for-testing-only";

/// Bootstrap administrator credentials.
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Gateway under test plus the database it runs on.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
}

/// Gateway with a live voting service on an ephemeral port, both on the
/// same in-memory database.
pub async fn spawn_app() -> TestApp {
    let db = Database::open_in_memory().await.unwrap();

    let voting = VotingConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..VotingConfig::default()
    };
    let rpc_addr = RpcServer::bind(&voting, db.clone())
        .await
        .unwrap()
        .spawn()
        .unwrap();

    let client = VoteClient::new(rpc_addr.to_string(), Duration::from_secs(5));
    build_app(db, client).await
}

/// Gateway whose vote client points at a port nobody listens on.
pub async fn spawn_app_without_voting() -> TestApp {
    let db = Database::open_in_memory().await.unwrap();
    let client = VoteClient::new("127.0.0.1:1", Duration::from_millis(500));
    build_app(db, client).await
}

async fn build_app(db: Database, client: VoteClient) -> TestApp {
    UserService::new(&db)
        .bootstrap_admin(&AdminConfig {
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            name: "Admin".to_string(),
        })
        .await
        .unwrap();

    let app_state = Arc::new(AppState::new(db.clone(), client, JWT_SECRET, 900, false));
    let jwt_state = Arc::new(JwtState::new(JWT_SECRET));
    let router = create_router(app_state, jwt_state, &[]);

    TestApp {
        server: TestServer::new(router).unwrap(),
        db,
    }
}

/// Register an account and return the response body.
pub async fn signup(server: &TestServer, email: &str, password: &str, name: &str) -> Value {
    server
        .post("/users/auth/signup")
        .json(&json!({ "email": email, "password": password, "name": name }))
        .await
        .json::<Value>()
}

/// Sign in and return the access token.
pub async fn signin(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/users/auth/signin")
        .json(&json!({ "email": email, "password": password }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["data"]["access_token"].as_str().unwrap().to_string()
}

/// Sign in as the bootstrap administrator.
pub async fn admin_token(server: &TestServer) -> String {
    signin(server, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

/// Register and sign in a regular user; returns (user id, token).
pub async fn user_token(server: &TestServer, email: &str, password: &str) -> (String, String) {
    let body = signup(server, email, password, "Someone").await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let token = signin(server, email, password).await;
    (id, token)
}
