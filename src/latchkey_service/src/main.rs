use color_eyre::eyre::Result;
use latchkey_adapters::{
    Argon2PasswordHasher, JwtTokenSigner, PostgresCredentialStore, config::Settings,
};
use latchkey_core::SystemClock;
use latchkey_service::{
    AuthService, AuthServiceConfig, configure_postgresql, configure_postmark_notifier,
    init_tracing,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let settings = Settings::load()?;

    let pg_pool = configure_postgresql(&settings).await?;
    let credential_store = PostgresCredentialStore::new(pg_pool);
    let notifier = configure_postmark_notifier(&settings)?;
    let token_signer = JwtTokenSigner::new(settings.jwt.secret.clone());

    let auth_service = AuthService::new(
        credential_store,
        notifier,
        Argon2PasswordHasher::new(),
        token_signer,
        SystemClock,
        AuthServiceConfig::from(&settings),
    );

    let listener = tokio::net::TcpListener::bind(&settings.application.address).await?;
    tracing::info!("Starting latchkey auth service...");

    auth_service
        .run_standalone(listener, settings.allowed_origins())
        .await?;

    Ok(())
}
