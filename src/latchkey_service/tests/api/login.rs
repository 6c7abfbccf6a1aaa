use latchkey_adapters::config::JWT_COOKIE_NAME;
use serde_json::{Value, json};

use crate::helpers::{TestApp, error_message};

#[tokio::test]
async fn should_return_token_and_cookie_for_active_account() {
    let app = TestApp::spawn().await;
    app.register_and_activate("a@x.com", "Secret123").await;

    let response = app
        .post_login(&json!({ "email": "a@x.com", "password": "Secret123" }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let cookie = response
        .cookies()
        .find(|cookie| cookie.name() == JWT_COOKIE_NAME)
        .expect("No auth cookie found");
    assert!(cookie.http_only());

    let cookie_value = cookie.value().to_owned();
    let body: Value = response.json().await.unwrap();
    let token = body["token"].as_str().unwrap();
    assert_eq!(token, cookie_value);

    let claims = app.signer.decode(token, "latchkey").unwrap();
    assert_eq!(claims.exp - claims.iat, 3600);
    assert_eq!(claims.role, "user");
}

#[tokio::test]
async fn should_return_401_for_wrong_password() {
    let app = TestApp::spawn().await;
    app.register_and_activate("a@x.com", "Secret123").await;

    let response = app
        .post_login(&json!({ "email": "a@x.com", "password": "wrong" }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn should_not_distinguish_pending_from_unknown_accounts() {
    let app = TestApp::spawn().await;
    app.post_register_initial(&json!({ "email": "pending@x.com", "password": "Secret123" }))
        .await;

    let pending = app
        .post_login(&json!({ "email": "pending@x.com", "password": "Secret123" }))
        .await;
    let unknown = app
        .post_login(&json!({ "email": "nobody@x.com", "password": "Secret123" }))
        .await;

    assert_eq!(pending.status().as_u16(), 401);
    assert_eq!(unknown.status().as_u16(), 401);
    assert_eq!(error_message(pending).await, error_message(unknown).await);
}

#[tokio::test]
async fn should_return_400_for_malformed_email() {
    let app = TestApp::spawn().await;

    let response = app
        .post_login(&json!({ "email": "nope", "password": "Secret123" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}
