//! Concurrent request handling.

mod common;

use axum::http::StatusCode;
use blogd::UserRepository;
use common::create_test_server;
use serde_json::json;

#[tokio::test]
async fn test_concurrent_signup_same_username() {
    let (server, db) = create_test_server().await;

    let first = server.post("/user/signup").json(&json!({
        "username": "alice",
        "password": "password123",
        "email": "alice1@example.com"
    }));
    let second = server.post("/user/signup").json(&json!({
        "username": "alice",
        "password": "password456",
        "email": "alice2@example.com"
    }));

    let (a, b) = tokio::join!(async { first.await }, async { second.await });

    let mut statuses = vec![a.status_code(), b.status_code()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
    assert_eq!(UserRepository::new(db.pool()).count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_logins_get_distinct_tokens() {
    let (server, _db) = create_test_server().await;
    common::signup(&server, "alice", "password123").await;

    let body = json!({"username": "alice", "password": "password123"});
    let (a, b) = tokio::join!(
        async { server.post("/user/login").json(&body).await },
        async { server.post("/user/login").json(&body).await },
    );
    a.assert_status_ok();
    b.assert_status_ok();

    let token_a = a.json::<serde_json::Value>()["data"]["access_token"].clone();
    let token_b = b.json::<serde_json::Value>()["data"]["access_token"].clone();
    assert_ne!(token_a, token_b);
}
