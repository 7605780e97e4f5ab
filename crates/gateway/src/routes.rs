//! Route configuration.

use std::time::Duration;

use axum::{middleware, Router};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{auth_routes, health_routes, product_routes};
use crate::middleware::auth_middleware;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check (no auth)
        .nest("/health", health_routes())
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Registration and login (no auth)
        .nest("/user", auth_routes())
        // Product routes (auth required)
        .merge(
            product_routes().route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        .with_state(state)
}

/// Wrap the router with request tracing, CORS and a per-request timeout.
pub fn with_http_layers(router: Router, request_timeout: Duration) -> Router {
    router
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
