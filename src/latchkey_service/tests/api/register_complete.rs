use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn should_activate_once() {
    let app = TestApp::spawn().await;
    app.post_register_initial(&json!({ "email": "a@x.com", "password": "Secret123" }))
        .await;
    let token = app.activation_token_for("a@x.com").await;

    let response = app.post_register_complete(&json!({ "token": token })).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert!(body["userId"].is_string());

    let response = app.post_register_complete(&json!({ "token": token })).await;
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn should_return_404_for_unknown_token() {
    let app = TestApp::spawn().await;

    let response = app
        .post_register_complete(&json!({ "token": "not-a-token" }))
        .await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn should_return_410_then_404_for_expired_token() {
    let app = TestApp::spawn().await;
    app.post_register_initial(&json!({ "email": "a@x.com", "password": "Secret123" }))
        .await;
    let token = app.activation_token_for("a@x.com").await;

    app.clock.advance(chrono::Duration::hours(25));

    let response = app.post_register_complete(&json!({ "token": token })).await;
    assert_eq!(response.status().as_u16(), 410);

    let response = app.post_register_complete(&json!({ "token": token })).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn should_reject_superseded_token() {
    let app = TestApp::spawn().await;
    let body = json!({ "email": "a@x.com", "password": "Secret123" });

    app.post_register_initial(&body).await;
    let first = app.activation_token_for("a@x.com").await;
    app.post_register_initial(&body).await;
    let second = app.activation_token_for("a@x.com").await;

    let response = app.post_register_complete(&json!({ "token": first })).await;
    assert_eq!(response.status().as_u16(), 404);

    let response = app.post_register_complete(&json!({ "token": second })).await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn should_return_400_for_malformed_body() {
    let app = TestApp::spawn().await;

    let response = app.post_register_complete(&json!({ "tokn": "abc" })).await;

    assert_eq!(response.status().as_u16(), 400);
}
