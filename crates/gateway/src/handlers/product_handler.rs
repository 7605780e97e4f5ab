//! Product handlers. Every route requires an authenticated user.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::{AppError, AppResult};
use domain::{Product, ProductResponse, SortKey};

use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Product create/update payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "widget")]
    pub name: String,
    // Stored as BIGINT
    #[validate(range(max = 9223372036854775807u64, message = "Price is out of range"))]
    #[schema(example = 10)]
    pub price: u64,
    #[validate(range(max = 9223372036854775807u64, message = "Quantity is out of range"))]
    #[schema(example = 5)]
    pub quantity: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductCreatedResponse {
    pub product_id: u64,
}

/// Listing filters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    /// Exact product name
    pub name: Option<String>,
    /// `name` or `last_create`
    pub sort_by: Option<String>,
}

/// Create product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/product/add", post(create_product))
        .route(
            "/product/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products", get(list_products))
}

fn parse_id(raw: &str) -> AppResult<u64> {
    raw.parse()
        .map_err(|_| AppError::bad_request(format!("invalid product id: {}", raw)))
}

/// Create a product owned by the caller
#[utoipa::path(
    post,
    path = "/product/add",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductCreatedResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<(StatusCode, Json<ProductCreatedResponse>)> {
    let product = Product::draft(current_user.name, payload.name, payload.price, payload.quantity);

    let tx = state.db.begin().await?;
    let product_id = state.products_service.create_product(&tx, product).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(ProductCreatedResponse { product_id })))
}

/// Get one of the caller's products
#[utoipa::path(
    get,
    path = "/product/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = u64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product", body = ProductResponse),
        (status = 400, description = "Invalid product id"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Product belongs to another user"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductResponse>> {
    let id = parse_id(&id)?;

    let tx = state.db.begin().await?;
    let product = state
        .products_service
        .find_product(&tx, id, &current_user.name)
        .await?;
    tx.commit().await?;

    Ok(Json(ProductResponse::from(product)))
}

/// Replace name, price and quantity
#[utoipa::path(
    put,
    path = "/product/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = u64, Path, description = "Product ID")
    ),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Product belongs to another user"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<Json<ProductResponse>> {
    let mut product = Product::draft(current_user.name, payload.name, payload.price, payload.quantity);
    product.id = parse_id(&id)?;

    let tx = state.db.begin().await?;
    let updated = state.products_service.update_product(&tx, product).await?;
    tx.commit().await?;

    Ok(Json(ProductResponse::from(updated)))
}

/// Delete one of the caller's products
#[utoipa::path(
    delete,
    path = "/product/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = u64, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, description = "Invalid product id"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Product belongs to another user"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;

    let tx = state.db.begin().await?;
    state
        .products_service
        .delete_product(&tx, id, &current_user.name)
        .await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the caller's products
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(ProductListQuery),
    responses(
        (status = 200, description = "Products of the caller", body = Vec<ProductResponse>),
        (status = 400, description = "Unknown sort key"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_products(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<Vec<ProductResponse>>> {
    let sort_key: SortKey = query
        .sort_by
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|e: domain::UnknownSortKey| AppError::bad_request(e.to_string()))?;
    let name_filter = query.name.unwrap_or_default();

    let tx = state.db.begin().await?;
    let products = state
        .products_service
        .find_product_list(&tx, &current_user.name, &name_filter, sort_key)
        .await?;
    tx.commit().await?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}
