//! Repository layer for credential storage.

pub mod entities;
mod auth_repository;

pub use auth_repository::{AuthRepository, AuthStore};

#[cfg(any(test, feature = "test-utils"))]
pub use auth_repository::MockAuthRepository;
