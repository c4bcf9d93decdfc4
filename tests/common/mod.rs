//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use axum::http::header::AUTHORIZATION;
use axum_test::TestServer;
use blogd::auth::TokenAuthority;
use blogd::web::create_app;
use blogd::{Config, Database};
use serde_json::{json, Value};

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";

/// Configuration for tests: fixed secret, generous rate limit.
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.auth.jwt_secret = TEST_SECRET.to_string();
    config.auth.login_rate_limit = 1000;
    config
}

/// Create a test server over a fresh in-memory database.
pub async fn create_test_server() -> (TestServer, Database) {
    create_test_server_with(create_test_config()).await
}

pub async fn create_test_server_with(config: Config) -> (TestServer, Database) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let router = create_app(&config, db.clone());
    let server = TestServer::new(router).expect("Failed to create test server");
    (server, db)
}

/// Sign up a user and return the new ID.
pub async fn signup(server: &TestServer, username: &str, password: &str) -> i64 {
    let response = server
        .post("/user/signup")
        .json(&json!({
            "username": username,
            "password": password,
            "email": format!("{username}@example.com"),
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["data"]["id"]
        .as_i64()
        .expect("signup returns an id")
}

/// Log in and return the access token from the response body.
pub async fn login(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/user/login")
        .json(&json!({
            "username": username,
            "password": password,
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["data"]["access_token"]
        .as_str()
        .expect("login returns an access token")
        .to_string()
}

/// Sign up and log in, returning `(user_id, token)`.
pub async fn signup_and_login(server: &TestServer, username: &str) -> (i64, String) {
    let id = signup(server, username, "password123").await;
    let token = login(server, username, "password123").await;
    (id, token)
}

/// A validly signed token for a user ID that was never stored.
pub fn token_for_missing_user() -> String {
    TokenAuthority::new(TEST_SECRET, 3600)
        .issue(999_999, "ghost")
        .expect("token issues")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Create a post as the token's owner and return its ID.
pub async fn create_post(server: &TestServer, token: &str, title: &str) -> i64 {
    let response = server
        .post("/posts/edit")
        .add_header(AUTHORIZATION, bearer(token))
        .json(&json!({
            "title": title,
            "content": format!("Body of {title}"),
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["data"]["id"]
        .as_i64()
        .expect("edit returns an id")
}
