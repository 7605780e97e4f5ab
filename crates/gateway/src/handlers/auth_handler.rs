//! Registration and login handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::Credentials;

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// User registration request
#[derive(Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Unique user name
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "alice")]
    pub username: String,
    /// Plaintext password
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "s3cret")]
    pub password: String,
}

/// User login request
#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "s3cret")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Signed bearer token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/user/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = MessageResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let tx = state.db.begin().await?;
    state
        .auth_service
        .create_user(&tx, Credentials::new(payload.username, payload.password))
        .await?;
    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "user successfully created".to_string(),
        }),
    ))
}

/// Login and get a bearer token
#[utoipa::path(
    post,
    path = "/user/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Incorrect password"),
        (status = 404, description = "User not found")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let tx = state.db.begin().await?;
    let token = state
        .auth_service
        .login_user(&tx, Credentials::new(payload.username, payload.password))
        .await?;
    tx.commit().await?;

    Ok(Json(TokenResponse { token }))
}
