//! Salted one-way password hashing with Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    #[error("incorrect credential")]
    IncorrectCredential,

    /// The stored value is not a PHC hash string
    #[error("malformed password hash: {0}")]
    MalformedHash(String),
}

/// Hashes and verifies passwords.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password. Every call uses a fresh salt.
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError>;

    /// Check `plaintext` against a hash produced by [`CredentialHasher::hash`].
    fn verify(&self, hashed: &str, plaintext: &str) -> Result<(), CredentialError>;
}

/// Argon2id with the crate's default parameters.
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| CredentialError::HashingFailed(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, hashed: &str, plaintext: &str) -> Result<(), CredentialError> {
        let parsed =
            PasswordHash::new(hashed).map_err(|e| CredentialError::MalformedHash(e.to_string()))?;
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .map_err(|_| CredentialError::IncorrectCredential)
    }
}
