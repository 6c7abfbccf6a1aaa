use secrecy::{ExposeSecret, Secret};

/// An encoded one-way password hash (PHC string format).
///
/// Produced by a [`PasswordHasher`](crate::PasswordHasher) and only ever
/// handed back to one. It has no public accessor outside the hasher and store
/// adapters, and its `Debug` output is redacted.
#[derive(Debug, Clone)]
pub struct PasswordHash(Secret<String>);

impl PasswordHash {
    /// Wrap an already-encoded hash, e.g. one read back from storage.
    pub fn from_encoded(encoded: String) -> Self {
        Self(Secret::new(encoded))
    }

    pub fn expose_encoded(&self) -> &str {
        self.0.expose_secret()
    }
}
