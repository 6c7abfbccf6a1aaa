use latchkey_adapters::{
    Argon2PasswordHasher, HashMapCredentialStore, JwtTokenSigner, MockNotifier, config::test,
};
use latchkey_core::{Email, ManualClock};
use latchkey_service::{AuthService, AuthServiceConfig};
use secrecy::Secret;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const JWT_SECRET: &str = "api-test-secret";

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub notifier: MockNotifier,
    pub clock: ManualClock,
    pub signer: JwtTokenSigner,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(AuthServiceConfig::default()).await
    }

    pub async fn spawn_with(config: AuthServiceConfig) -> Self {
        let notifier = MockNotifier::new();
        let clock = ManualClock::default();
        let signer = JwtTokenSigner::new(Secret::from(JWT_SECRET.to_string()));

        let auth_service = AuthService::new(
            HashMapCredentialStore::new(),
            notifier.clone(),
            Argon2PasswordHasher::new(),
            signer.clone(),
            clock.clone(),
            config,
        );

        let listener = TcpListener::bind(test::APP_ADDRESS).await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(auth_service.run_standalone(listener, None));

        let http_client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap();

        Self {
            address,
            http_client,
            notifier,
            clock,
            signer,
        }
    }

    async fn post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!("{}/api/auth{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_register_initial(&self, body: &Value) -> reqwest::Response {
        self.post("/register/initial", body).await
    }

    pub async fn post_register_complete(&self, body: &Value) -> reqwest::Response {
        self.post("/register/complete", body).await
    }

    pub async fn post_login(&self, body: &Value) -> reqwest::Response {
        self.post("/login", body).await
    }

    pub async fn activation_token_for(&self, email: &str) -> String {
        let email = Email::try_from(email).unwrap();
        self.notifier
            .last_token_for(&email)
            .await
            .expect("no activation message was sent")
            .as_str()
            .to_owned()
    }

    pub async fn register_and_activate(&self, email: &str, password: &str) {
        let response = self
            .post_register_initial(&json!({ "email": email, "password": password }))
            .await;
        assert_eq!(response.status().as_u16(), 202);

        let token = self.activation_token_for(email).await;
        let response = self.post_register_complete(&json!({ "token": token })).await;
        assert_eq!(response.status().as_u16(), 200);
    }
}

pub async fn error_message(response: reqwest::Response) -> String {
    let body: Value = response.json().await.unwrap();
    body["error"].as_str().unwrap_or_default().to_owned()
}
