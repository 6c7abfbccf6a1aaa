use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use latchkey_core::{SessionClaims, SessionToken, TokenSigner, TokenSignerError, UserId};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// Claims carried by every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub role: String,
    pub iss: String,
}

/// HS256 JWT signer.
#[derive(Clone)]
pub struct JwtTokenSigner {
    secret: Secret<String>,
}

impl JwtTokenSigner {
    pub fn new(secret: Secret<String>) -> Self {
        Self { secret }
    }

    /// Check signature, expiry and issuer of a token produced by `issue`.
    pub fn decode(
        &self,
        token: &str,
        issuer: &str,
    ) -> Result<SessionTokenClaims, TokenSignerError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        decode::<SessionTokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| TokenSignerError(e.to_string()))
    }
}

#[async_trait::async_trait]
impl TokenSigner for JwtTokenSigner {
    #[tracing::instrument(name = "Signing session token", skip_all)]
    async fn issue(
        &self,
        user_id: &UserId,
        claims: &SessionClaims,
    ) -> Result<SessionToken, TokenSignerError> {
        let claims = SessionTokenClaims {
            sub: user_id.to_string(),
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
            role: claims.role.clone(),
            iss: claims.issuer.clone(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map(SessionToken)
        .map_err(|e| TokenSignerError(e.to_string()))
    }
}

// Create cookie and set the value to the passed-in token string
pub fn create_auth_cookie(token: SessionToken, cookie_name: &str) -> Cookie<'static> {
    Cookie::build((cookie_name.to_owned(), token.into_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build()
}
