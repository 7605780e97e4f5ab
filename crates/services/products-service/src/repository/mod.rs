//! Repository layer for product rows.

pub mod entities;
mod products_repository;

pub use products_repository::{ProductStore, ProductsRepository};

#[cfg(any(test, feature = "test-utils"))]
pub use products_repository::MockProductsRepository;
