use serde_json::{Value, json};

use crate::helpers::{TestApp, error_message};

#[tokio::test]
async fn should_return_202_and_send_activation_link() {
    let app = TestApp::spawn().await;

    let response = app
        .post_register_initial(&json!({
            "email": "a@x.com",
            "password": "Secret123",
            "displayName": "Ada"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 202);
    let body: Value = response.json().await.unwrap();
    assert!(body["message"].is_string());
    assert!(body["expiresAt"].is_string());

    let sent = app.notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0.as_str(), "a@x.com");
}

#[tokio::test]
async fn should_return_400_for_invalid_input() {
    let app = TestApp::spawn().await;

    let cases = [
        json!({ "email": "not-an-email", "password": "Secret123" }),
        json!({ "email": "a@x.com", "password": "short1" }),
        json!({ "email": "a@x.com", "password": "NoDigitsHere" }),
        json!({ "email": "a@x.com", "password": "Secret123", "displayName": "x".repeat(65) }),
        json!({ "email": "a@x.com" }),
    ];

    for case in cases {
        let response = app.post_register_initial(&case).await;
        assert_eq!(response.status().as_u16(), 400, "input: {case}");
    }
    assert!(app.notifier.sent().await.is_empty());
}

#[tokio::test]
async fn should_return_409_if_email_belongs_to_active_account() {
    let app = TestApp::spawn().await;
    app.register_and_activate("a@x.com", "Secret123").await;

    let response = app
        .post_register_initial(&json!({ "email": "A@X.COM", "password": "Secret456" }))
        .await;

    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn should_return_502_when_notification_fails_and_allow_retry() {
    let app = TestApp::spawn().await;
    let body = json!({ "email": "a@x.com", "password": "Secret123" });

    app.notifier.set_failing(true).await;
    let response = app.post_register_initial(&body).await;
    assert_eq!(response.status().as_u16(), 502);
    assert!(error_message(response).await.contains("register again"));

    app.notifier.set_failing(false).await;
    let response = app.post_register_initial(&body).await;
    assert_eq!(response.status().as_u16(), 202);
    assert_eq!(app.notifier.sent().await.len(), 1);
}
