use latchkey_adapters::{
    PostmarkNotifier,
    config::{Settings, SettingsError},
};
use secrecy::ExposeSecret;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configure and return a PostgreSQL connection pool
///
/// Creates the pool from the `postgres` settings and runs all pending
/// migrations before returning it.
pub async fn configure_postgresql(settings: &Settings) -> Result<PgPool, sqlx::Error> {
    let pg_pool = PgPoolOptions::new()
        .max_connections(settings.postgres.max_connections)
        .connect(settings.postgres.url.expose_secret())
        .await?;

    sqlx::migrate!().run(&pg_pool).await?;

    Ok(pg_pool)
}

#[derive(Debug, thiserror::Error)]
pub enum NotifierSetupError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Build the Postmark notifier from the `email_client` and `activation`
/// settings.
pub fn configure_postmark_notifier(
    settings: &Settings,
) -> Result<PostmarkNotifier, NotifierSetupError> {
    let http_client = reqwest::Client::builder()
        .timeout(settings.email_client.timeout())
        .build()?;

    Ok(PostmarkNotifier::new(
        settings.email_client.base_url.clone(),
        settings.email_client.sender_email()?,
        settings.email_client.auth_token.clone(),
        http_client,
    )
    .with_activation_link(
        settings.activation.link_base_url.clone(),
        settings.activation.ttl_hours,
    ))
}

pub fn init_tracing() -> color_eyre::eyre::Result<()> {
    let fmt_layer = fmt::layer().compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}
