use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, request},
    routing::post,
};
use latchkey_adapters::{
    config::{AllowedOrigins, JWT_COOKIE_NAME, Settings, prod},
    http::routes::{FlowState, login, register_complete, register_initial},
};
use latchkey_application::{ActivateUseCase, LoginUseCase, PreRegisterUseCase};
use latchkey_core::{
    ClaimsPolicy, Clock, CredentialStore, Notifier, PasswordHasher, RegistrationPolicy,
    TokenSigner,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::request_tracing::{make_span_with_request_id, on_request, on_response};

/// Policies and limits the service applies to every flow.
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    pub registration_policy: RegistrationPolicy,
    pub claims_policy: ClaimsPolicy,
    pub request_timeout: Duration,
    pub cookie_name: String,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            registration_policy: RegistrationPolicy::default(),
            claims_policy: ClaimsPolicy::default(),
            request_timeout: Duration::from_millis(prod::REQUEST_TIMEOUT_MILLIS),
            cookie_name: JWT_COOKIE_NAME.to_owned(),
        }
    }
}

impl From<&Settings> for AuthServiceConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            registration_policy: settings.registration_policy(),
            claims_policy: settings.claims_policy(),
            request_timeout: settings.request_timeout(),
            cookie_name: settings.jwt.cookie_name.clone(),
        }
    }
}

/// Registration and login routes, mounted under `/api/auth`
pub struct AuthService {
    router: Router,
}

impl AuthService {
    /// Create a new AuthService from its capabilities
    ///
    /// # Arguments
    /// * `credential_store` - Users and activation tokens
    /// * `notifier` - Delivers activation links
    /// * `password_hasher` - Hashes and verifies passwords
    /// * `token_signer` - Signs session tokens
    /// * `clock` - Time source for expiry decisions
    /// * `config` - Policies and request timeout
    ///
    /// Each route gets only the flow it serves as state.
    pub fn new<S, N, H, T, C>(
        credential_store: S,
        notifier: N,
        password_hasher: H,
        token_signer: T,
        clock: C,
        config: AuthServiceConfig,
    ) -> Self
    where
        S: CredentialStore + Clone + 'static,
        N: Notifier + 'static,
        H: PasswordHasher + Clone + 'static,
        T: TokenSigner + 'static,
        C: Clock + Clone + 'static,
    {
        let timeout = config.request_timeout;

        let pre_register = PreRegisterUseCase::new(
            credential_store.clone(),
            notifier,
            password_hasher.clone(),
            clock.clone(),
            config.registration_policy,
        );
        let activate = ActivateUseCase::new(credential_store.clone(), clock.clone());
        let login_flow = LoginUseCase::new(
            credential_store,
            password_hasher,
            token_signer,
            clock,
            config.claims_policy,
        );

        let auth_routes = Router::new()
            .route("/register/initial", post(register_initial::<S, N, H, C>))
            .with_state(FlowState::new(pre_register, timeout))
            .route("/register/complete", post(register_complete::<S, C>))
            .with_state(FlowState::new(activate, timeout))
            .route("/login", post(login::<S, H, T, C>))
            .with_state((FlowState::new(login_flow, timeout), config.cookie_name));

        let router = Router::new().nest("/api/auth", auth_routes);

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the AuthService into a router that can be merged into another application
    ///
    /// # Arguments
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub fn into_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::POST])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the auth service as a standalone server
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.into_router(allowed_origins);

        tracing::info!("Auth service listening on {}", listener.local_addr()?);

        axum_server::Server::<std::net::SocketAddr>::from_listener(listener)
            .serve(router.into_make_service())
            .await
    }
}
