//! Product business logic.

mod products_service;

pub use products_service::{ProductManager, ProductsService};

#[cfg(any(test, feature = "test-utils"))]
pub use products_service::MockProductsService;
