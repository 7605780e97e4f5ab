//! Credential repository. Every statement runs on the caller's transaction.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, Set};

use super::entities::user::{ActiveModel, Entity as UserEntity};
use common::database::repository_error;
use domain::{RepositoryError, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Insert a user. A taken name yields [`RepositoryError::Duplicate`].
    async fn create_user(&self, tx: &DatabaseTransaction, user: &User) -> Result<(), RepositoryError>;

    /// Fetch the stored password hash for `name`.
    async fn find_password(&self, tx: &DatabaseTransaction, name: &str) -> Result<String, RepositoryError>;
}

/// PostgreSQL implementation of [`AuthRepository`]
#[derive(Debug, Clone, Default)]
pub struct AuthStore;

impl AuthStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuthRepository for AuthStore {
    #[tracing::instrument(skip_all, fields(user = %user.name))]
    async fn create_user(&self, tx: &DatabaseTransaction, user: &User) -> Result<(), RepositoryError> {
        let active_model = ActiveModel {
            name: Set(user.name.clone()),
            password: Set(user.password_hash.clone()),
        };

        active_model.insert(tx).await.map_err(repository_error)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, tx))]
    async fn find_password(&self, tx: &DatabaseTransaction, name: &str) -> Result<String, RepositoryError> {
        let model = UserEntity::find_by_id(name.to_owned())
            .one(tx)
            .await
            .map_err(repository_error)?
            .ok_or(RepositoryError::NotFound)?;

        Ok(model.password)
    }
}
