//! HTTP-level tests against mocked services.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use mockall::predicate::*;
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::{json, Value};
use tower::ServiceExt;

use auth_service_lib::crypto::MockTokenIssuer;
use auth_service_lib::service::MockAuthService;
use auth_service_lib::TokenError;
use domain::{DomainError, Product, SortKey};
use gateway_lib::infra::Database;
use gateway_lib::routes::create_router;
use gateway_lib::state::AppState;
use products_service_lib::service::MockProductsService;

const TOKEN: &str = "valid-token";

fn tokens_for(name: &'static str) -> MockTokenIssuer {
    let mut tokens = MockTokenIssuer::new();
    tokens
        .expect_parse()
        .with(eq(TOKEN))
        .returning(move |_| Ok(name.to_string()));
    tokens
        .expect_parse()
        .returning(|_| Err(TokenError::ParseFailed("bad signature".into())));
    tokens
}

fn app(auth: MockAuthService, products: MockProductsService, tokens: MockTokenIssuer) -> Router {
    let db = Database::from_connection(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    create_router(AppState::new(db, Arc::new(auth), Arc::new(products), Arc::new(tokens)))
}

fn products_app(products: MockProductsService) -> Router {
    app(MockAuthService::new(), products, tokens_for("alice"))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn widget(owner: &str) -> Product {
    Product {
        id: 7,
        name: "widget".to_string(),
        price: 10,
        quantity: 5,
        owner_name: owner.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn test_register_created() {
    let mut auth = MockAuthService::new();
    auth.expect_create_user()
        .withf(|_, creds| creds.username == "alice" && creds.password == "pw1")
        .times(1)
        .returning(|_, _| Ok(()));

    let response = app(auth, MockProductsService::new(), MockTokenIssuer::new())
        .oneshot(json_request("POST", "/user/register", json!({"username": "alice", "password": "pw1"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_register_duplicate_conflict() {
    let mut auth = MockAuthService::new();
    auth.expect_create_user()
        .returning(|_, _| Err(DomainError::UserAlreadyExists));

    let response = app(auth, MockProductsService::new(), MockTokenIssuer::new())
        .oneshot(json_request("POST", "/user/register", json!({"username": "alice", "password": "pw2"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_register_empty_username_rejected() {
    let mut auth = MockAuthService::new();
    auth.expect_create_user().never();

    let response = app(auth, MockProductsService::new(), MockTokenIssuer::new())
        .oneshot(json_request("POST", "/user/register", json!({"username": "", "password": "pw"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_returns_token() {
    let mut auth = MockAuthService::new();
    auth.expect_login_user()
        .returning(|_, _| Ok("signed".to_string()));

    let response = app(auth, MockProductsService::new(), MockTokenIssuer::new())
        .oneshot(json_request("POST", "/user/login", json!({"username": "alice", "password": "pw1"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["token"], "signed");
}

#[tokio::test]
async fn test_login_failures_map_to_status() {
    for (error, status) in [
        (DomainError::IncorrectCredential, StatusCode::UNAUTHORIZED),
        (DomainError::UserNotFound, StatusCode::NOT_FOUND),
        (DomainError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
    ] {
        let mut auth = MockAuthService::new();
        let returned = error.clone();
        auth.expect_login_user()
            .returning(move |_, _| Err(returned.clone()));

        let response = app(auth, MockProductsService::new(), MockTokenIssuer::new())
            .oneshot(json_request("POST", "/user/login", json!({"username": "alice", "password": "x"})))
            .await
            .unwrap();

        assert_eq!(response.status(), status, "for {:?}", error);
    }
}

#[tokio::test]
async fn test_products_require_bearer_token() {
    let mut products = MockProductsService::new();
    products.expect_find_product_list().never();

    let request = Request::builder().uri("/products").body(Body::empty()).unwrap();
    let response = products_app(products).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let request = Request::builder()
        .uri("/products")
        .header(header::AUTHORIZATION, "Bearer forged")
        .body(Body::empty())
        .unwrap();

    let response = products_app(MockProductsService::new()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_product_owned_by_caller() {
    let mut products = MockProductsService::new();
    products
        .expect_create_product()
        .withf(|_, p| p.owner_name == "alice" && p.name == "widget" && p.price == 10 && p.quantity == 5)
        .times(1)
        .returning(|_, _| Ok(7));

    let response = products_app(products)
        .oneshot(json_request("POST", "/product/add", json!({"name": "widget", "price": 10, "quantity": 5})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["product_id"], 7);
}

#[tokio::test]
async fn test_get_product_returns_public_fields() {
    let mut products = MockProductsService::new();
    products
        .expect_find_product()
        .with(always(), eq(7), eq("alice"))
        .returning(|_, _, _| Ok(widget("alice")));

    let response = products_app(products).oneshot(authed("GET", "/product/7")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], 7);
    assert_eq!(body["name"], "widget");
    assert_eq!(body["created_at"], "2024-03-01T12:00:00Z");
    assert!(body.get("owner_name").is_none());
}

#[tokio::test]
async fn test_get_product_errors() {
    for (error, status) in [
        (DomainError::PermissionDenied, StatusCode::FORBIDDEN),
        (DomainError::ProductNotFound, StatusCode::NOT_FOUND),
    ] {
        let mut products = MockProductsService::new();
        let returned = error.clone();
        products
            .expect_find_product()
            .returning(move |_, _, _| Err(returned.clone()));

        let response = products_app(products).oneshot(authed("GET", "/product/7")).await.unwrap();

        assert_eq!(response.status(), status, "for {:?}", error);
    }
}

#[tokio::test]
async fn test_invalid_product_id_is_bad_request() {
    let mut products = MockProductsService::new();
    products.expect_find_product().never();

    let response = products_app(products).oneshot(authed("GET", "/product/abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_amounts_beyond_storage_range_are_bad_request() {
    let mut products = MockProductsService::new();
    products.expect_create_product().never();
    products.expect_update_product().never();
    let app = products_app(products);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/product/add",
            json!({"name": "widget", "price": 9223372036854775808u64, "quantity": 5}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_request(
            "PUT",
            "/product/7",
            json!({"name": "widget", "price": 10, "quantity": u64::MAX}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_largest_storable_price_is_accepted() {
    let mut products = MockProductsService::new();
    products
        .expect_create_product()
        .withf(|_, p| p.price == i64::MAX as u64)
        .times(1)
        .returning(|_, _| Ok(8));

    let response = products_app(products)
        .oneshot(json_request(
            "POST",
            "/product/add",
            json!({"name": "widget", "price": i64::MAX as u64, "quantity": 5}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_update_product_uses_path_id() {
    let mut products = MockProductsService::new();
    products
        .expect_update_product()
        .withf(|_, p| p.id == 7 && p.owner_name == "alice" && p.name == "gadget")
        .returning(|_, p| Ok(Product { created_at: widget("alice").created_at, ..p }));

    let response = products_app(products)
        .oneshot(json_request("PUT", "/product/7", json!({"name": "gadget", "price": 3, "quantity": 1})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "gadget");
}

#[tokio::test]
async fn test_delete_product_no_content() {
    let mut products = MockProductsService::new();
    products
        .expect_delete_product()
        .with(always(), eq(7), eq("alice"))
        .times(1)
        .returning(|_, _, _| Ok(()));

    let response = products_app(products).oneshot(authed("DELETE", "/product/7")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_list_products_passes_filter_and_sort() {
    let mut products = MockProductsService::new();
    products
        .expect_find_product_list()
        .with(always(), eq("alice"), eq("widget"), eq(SortKey::ByLastCreated))
        .returning(|_, _, _, _| Ok(vec![widget("alice")]));

    let response = products_app(products)
        .oneshot(authed("GET", "/products?name=widget&sort_by=last_create"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_products_unknown_sort_is_bad_request() {
    let mut products = MockProductsService::new();
    products.expect_find_product_list().never();

    let response = products_app(products)
        .oneshot(authed("GET", "/products?sort_by=price"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_internal_error_hides_details() {
    let mut products = MockProductsService::new();
    products
        .expect_find_product_list()
        .returning(|_, _, _, _| Err(DomainError::Internal));

    let response = products_app(products).oneshot(authed("GET", "/products")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "An internal error occurred");
}
