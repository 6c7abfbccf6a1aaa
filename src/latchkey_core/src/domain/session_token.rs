use chrono::{DateTime, Utc};

/// Signed, self-contained credential handed out after a successful login.
///
/// The core never stores or verifies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for SessionToken {
    fn from(s: String) -> Self {
        SessionToken(s)
    }
}

/// Claims attached to a session token besides the subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub role: String,
    pub issuer: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
