use std::time::Duration;

use axum::http::HeaderValue;
use config::{ConfigBuilder, builder::DefaultState};
use latchkey_core::{ClaimsPolicy, Email, PasswordPolicy, RegistrationPolicy};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use thiserror::Error;

use super::constants::{
    CONFIG_DIR, DEFAULT_ENVIRONMENT, JWT_COOKIE_NAME,
    env::{APP_ENVIRONMENT_ENV_VAR, SETTINGS_ENV_PREFIX, SETTINGS_ENV_SEPARATOR},
    prod,
};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub postgres: PostgresSettings,
    pub jwt: JwtSettings,
    pub activation: ActivationSettings,
    pub password_policy: PasswordPolicySettings,
    pub email_client: EmailClientSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub address: String,
    pub request_timeout_millis: u64,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    pub url: Secret<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    pub secret: Secret<String>,
    pub ttl_seconds: i64,
    pub issuer: String,
    pub role: String,
    pub cookie_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivationSettings {
    pub ttl_hours: i64,
    pub link_base_url: String,
    pub replace_pending: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordPolicySettings {
    pub min_length: usize,
    pub max_length: usize,
    pub require_letter: bool,
    pub require_digit: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender: String,
    pub auth_token: Secret<String>,
    pub timeout_millis: u64,
}

impl EmailClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }

    pub fn sender_email(&self) -> Result<Email, SettingsError> {
        Email::try_from(self.sender.as_str())
            .map_err(|e| SettingsError::Invalid(format!("email_client.sender: {e}")))
    }
}

/// Origins allowed to call the service from a browser.
#[derive(Debug, Clone)]
pub struct AllowedOrigins(Vec<HeaderValue>);

impl AllowedOrigins {
    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0.contains(origin)
    }
}

impl Settings {
    /// Load settings from `config/base`, `config/{APP_ENVIRONMENT}` and
    /// `LATCHKEY__*` environment variables, later sources winning.
    ///
    /// A `.env` file, when present, is read into the environment first.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let environment = std::env::var(APP_ENVIRONMENT_ENV_VAR)
            .unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_owned());
        tracing::debug!(%environment, "Loading settings");

        let builder = defaults()?
            .add_source(config::File::with_name(&format!("{CONFIG_DIR}/base")).required(false))
            .add_source(
                config::File::with_name(&format!("{CONFIG_DIR}/{environment}")).required(false),
            )
            .add_source(
                config::Environment::with_prefix(SETTINGS_ENV_PREFIX)
                    .prefix_separator(SETTINGS_ENV_SEPARATOR)
                    .separator(SETTINGS_ENV_SEPARATOR)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("application.allowed_origins"),
            );

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.jwt.secret.expose_secret().is_empty() {
            return Err(SettingsError::Invalid("jwt.secret must not be empty".into()));
        }
        if self.jwt.ttl_seconds <= 0 {
            return Err(SettingsError::Invalid("jwt.ttl_seconds must be positive".into()));
        }
        if self.activation.ttl_hours <= 0 {
            return Err(SettingsError::Invalid(
                "activation.ttl_hours must be positive".into(),
            ));
        }
        let policy = &self.password_policy;
        if policy.min_length == 0 || policy.min_length > policy.max_length {
            return Err(SettingsError::Invalid(format!(
                "password_policy: need 0 < min_length <= max_length, got {}..{}",
                policy.min_length, policy.max_length
            )));
        }
        for origin in &self.application.allowed_origins {
            HeaderValue::from_str(origin).map_err(|_| {
                SettingsError::Invalid(format!("application.allowed_origins: {origin}"))
            })?;
        }
        self.email_client.sender_email()?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.application.request_timeout_millis)
    }

    pub fn allowed_origins(&self) -> Option<AllowedOrigins> {
        let origins: Vec<HeaderValue> = self
            .application
            .allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();

        (!origins.is_empty()).then_some(AllowedOrigins(origins))
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy {
            min_length: self.password_policy.min_length,
            max_length: self.password_policy.max_length,
            require_letter: self.password_policy.require_letter,
            require_digit: self.password_policy.require_digit,
        }
    }

    pub fn registration_policy(&self) -> RegistrationPolicy {
        RegistrationPolicy {
            activation_ttl: chrono::Duration::hours(self.activation.ttl_hours),
            replace_pending: self.activation.replace_pending,
            password: self.password_policy(),
        }
    }

    pub fn claims_policy(&self) -> ClaimsPolicy {
        ClaimsPolicy {
            ttl: chrono::Duration::seconds(self.jwt.ttl_seconds),
            role: self.jwt.role.clone(),
            issuer: self.jwt.issuer.clone(),
        }
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    let password_policy = PasswordPolicy::default();

    config::Config::builder()
        .set_default("application.address", prod::APP_ADDRESS)?
        .set_default(
            "application.request_timeout_millis",
            prod::REQUEST_TIMEOUT_MILLIS,
        )?
        .set_default("application.allowed_origins", Vec::<String>::new())?
        .set_default("postgres.max_connections", prod::postgres::MAX_CONNECTIONS)?
        .set_default("jwt.ttl_seconds", prod::jwt::TTL_SECONDS)?
        .set_default("jwt.issuer", prod::jwt::ISSUER)?
        .set_default("jwt.role", prod::jwt::ROLE)?
        .set_default("jwt.cookie_name", JWT_COOKIE_NAME)?
        .set_default("activation.ttl_hours", prod::activation::TTL_HOURS)?
        .set_default("activation.link_base_url", prod::activation::LINK_BASE_URL)?
        .set_default("activation.replace_pending", true)?
        .set_default("password_policy.min_length", password_policy.min_length as u64)?
        .set_default("password_policy.max_length", password_policy.max_length as u64)?
        .set_default("password_policy.require_letter", password_policy.require_letter)?
        .set_default("password_policy.require_digit", password_policy.require_digit)?
        .set_default("email_client.base_url", prod::email_client::BASE_URL)?
        .set_default("email_client.sender", prod::email_client::SENDER)?
        .set_default("email_client.timeout_millis", prod::email_client::TIMEOUT_MILLIS)
}
