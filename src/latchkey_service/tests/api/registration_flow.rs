use latchkey_adapters::{
    Argon2PasswordHasher, HashMapCredentialStore, JwtTokenSigner, MockNotifier,
};
use latchkey_application::{
    ActivateError, ActivateUseCase, LoginError, LoginUseCase, PreRegisterError,
    PreRegisterRequest, PreRegisterUseCase,
};
use latchkey_core::{
    ClaimsPolicy, CredentialStore, Email, ManualClock, ProfileFields, RegistrationPolicy,
    UserStatus,
};
use secrecy::Secret;

fn secret(value: &str) -> Secret<String> {
    Secret::from(value.to_string())
}

fn request(email: &str, password: &str) -> PreRegisterRequest {
    PreRegisterRequest {
        email: secret(email),
        password: secret(password),
        profile: ProfileFields::default(),
    }
}

#[tokio::test]
async fn should_pre_register_activate_and_login() {
    let store = HashMapCredentialStore::new();
    let notifier = MockNotifier::new();
    let clock = ManualClock::default();
    let signer = JwtTokenSigner::new(secret("scenario-secret"));

    let pre_register = PreRegisterUseCase::new(
        store.clone(),
        notifier.clone(),
        Argon2PasswordHasher::new(),
        clock.clone(),
        RegistrationPolicy::default(),
    );
    let activate = ActivateUseCase::new(store.clone(), clock.clone());
    let login = LoginUseCase::new(
        store.clone(),
        Argon2PasswordHasher::new(),
        signer.clone(),
        clock.clone(),
        ClaimsPolicy::default(),
    );

    let sent = pre_register
        .execute(request("a@x.com", "Secret123"))
        .await
        .unwrap();

    let email = Email::try_from("a@x.com").unwrap();
    let deliveries = notifier.sent().await;
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].0, email);
    let token = deliveries[0].1.as_str().to_owned();

    let activated = activate.execute(secret(&token)).await.unwrap();
    assert_eq!(activated, sent.user_id);
    let user = store.find_user_by_email(&email).await.unwrap().unwrap();
    assert_eq!(user.status(), UserStatus::Active);

    let again = activate.execute(secret(&token)).await;
    assert!(matches!(again, Err(ActivateError::TokenAlreadyUsed)));

    let session = login
        .execute(secret("a@x.com"), secret("Secret123"))
        .await
        .unwrap();
    assert!(!session.as_str().is_empty());
    let claims = signer.decode(session.as_str(), "latchkey").unwrap();
    assert_eq!(claims.sub, sent.user_id.to_string());

    let wrong = login.execute(secret("a@x.com"), secret("wrong")).await;
    assert!(matches!(wrong, Err(LoginError::InvalidCredentials)));
}

#[tokio::test]
async fn should_keep_first_registration_when_replacement_is_disabled() {
    let store = HashMapCredentialStore::new();
    let notifier = MockNotifier::new();
    let pre_register = PreRegisterUseCase::new(
        store.clone(),
        notifier.clone(),
        Argon2PasswordHasher::new(),
        ManualClock::default(),
        RegistrationPolicy {
            replace_pending: false,
            ..RegistrationPolicy::default()
        },
    );

    // Hashing yields to the blocking pool, so both lookups can miss
    let (first, second) = tokio::join!(
        pre_register.execute(request("a@x.com", "Secret123")),
        pre_register.execute(request("a@x.com", "Secret123")),
    );

    let taken = [&first, &second]
        .iter()
        .filter(|r| matches!(r, Err(PreRegisterError::EmailTaken)))
        .count();
    assert_eq!(taken, 1);
    assert!(first.is_ok() || second.is_ok());

    let deliveries = notifier.sent().await;
    assert_eq!(deliveries.len(), 1);

    let activate = ActivateUseCase::new(store.clone(), ManualClock::default());
    let token = deliveries[0].1.as_str().to_owned();
    assert!(activate.execute(secret(&token)).await.is_ok());
}
