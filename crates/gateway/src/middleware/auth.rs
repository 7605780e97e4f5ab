//! Bearer token authentication.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};

use common::{AppError, AppResult};
use domain::BEARER_TOKEN_PREFIX;

use crate::state::AppState;

/// Principal resolved from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub name: String,
}

/// Resolve `Authorization: Bearer <token>` into a [`CurrentUser`].
///
/// Every failure is a 401; the token error kind is only logged.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&request)?;

    let name = state.tokens.parse(token).map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        AppError::Unauthorized
    })?;

    request.extensions_mut().insert(CurrentUser { name });

    Ok(next.run(request).await)
}

/// Extract bearer token from Authorization header.
fn extract_token(request: &Request<Body>) -> AppResult<&str> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    match auth_header.strip_prefix(BEARER_TOKEN_PREFIX) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AppError::Unauthorized),
    }
}
