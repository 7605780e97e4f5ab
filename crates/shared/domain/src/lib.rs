//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Entities, errors and ports defined here are shared by the auth and
//! products services and by the gateway.

pub mod clock;
pub mod constants;
pub mod error;
pub mod product;
pub mod user;

pub use clock::{Clock, SystemClock};
pub use constants::*;
pub use error::{DomainError, DomainResult, RepositoryError};
pub use product::{Product, ProductResponse, SortKey, UnknownSortKey};
pub use user::{Credentials, User};

#[cfg(any(test, feature = "test-utils"))]
pub use clock::MockClock;
