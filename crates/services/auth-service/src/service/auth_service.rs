//! Authentication service - Handles user registration and login.
//!
//! The caller owns the transaction: nothing here begins, commits or rolls
//! back. Infrastructure failures are logged and reported as
//! [`DomainError::Internal`].

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseTransaction;
use tracing::{error, instrument};

use crate::crypto::{CredentialError, CredentialHasher, TokenIssuer};
use crate::repository::AuthRepository;
use domain::{Credentials, DomainError, DomainResult, RepositoryError, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Authentication service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn create_user(&self, tx: &DatabaseTransaction, credentials: Credentials) -> DomainResult<()>;

    /// Check credentials and return a signed token
    async fn login_user(&self, tx: &DatabaseTransaction, credentials: Credentials) -> DomainResult<String>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    repo: Arc<dyn AuthRepository>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(
        repo: Arc<dyn AuthRepository>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self { repo, hasher, tokens }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    #[instrument(skip_all, fields(user = %credentials.username))]
    async fn create_user(&self, tx: &DatabaseTransaction, credentials: Credentials) -> DomainResult<()> {
        let password_hash = self.hasher.hash(&credentials.password).map_err(|e| {
            error!(error = %e, "failed to hash password");
            DomainError::Internal
        })?;

        let user = User::new(credentials.username, password_hash);

        self.repo.create_user(tx, &user).await.map_err(|e| match e {
            RepositoryError::Duplicate => DomainError::UserAlreadyExists,
            other => {
                error!(error = %other, "failed to store user");
                DomainError::Internal
            }
        })
    }

    #[instrument(skip_all, fields(user = %credentials.username))]
    async fn login_user(&self, tx: &DatabaseTransaction, credentials: Credentials) -> DomainResult<String> {
        let stored_hash = self
            .repo
            .find_password(tx, &credentials.username)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => DomainError::UserNotFound,
                other => {
                    error!(error = %other, "failed to load password hash");
                    DomainError::Internal
                }
            })?;

        self.hasher
            .verify(&stored_hash, &credentials.password)
            .map_err(|e| match e {
                CredentialError::IncorrectCredential => DomainError::IncorrectCredential,
                other => {
                    error!(error = %other, "stored password hash is unusable");
                    DomainError::Internal
                }
            })?;

        self.tokens.issue(&credentials.username).map_err(|e| {
            error!(error = %e, "failed to issue token");
            DomainError::Internal
        })
    }
}
