//! Application state for dependency injection.

use std::sync::Arc;

use auth_service_lib::{AuthService, TokenIssuer};
use products_service_lib::ProductsService;

use crate::infra::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth_service: Arc<dyn AuthService>,
    pub products_service: Arc<dyn ProductsService>,
    pub tokens: Arc<dyn TokenIssuer>,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        db: Database,
        auth_service: Arc<dyn AuthService>,
        products_service: Arc<dyn ProductsService>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            db,
            auth_service,
            products_service,
            tokens,
        }
    }
}
