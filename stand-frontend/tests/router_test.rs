mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::{assert_money, body_json, TestApp};
use http_body_util::BodyExt;
use serde_json::json;
use stand_core::observability::REQUEST_ID_HEADER;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn health_check_works_without_credentials() {
    let app = TestApp::spawn().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn metrics_are_exposed_in_text_format() {
    let app = TestApp::spawn().await;
    app.get("/health").await;

    let response = app.get("/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("http_requests_total"));
}

#[tokio::test]
async fn api_requires_bearer_token() {
    let app = TestApp::spawn().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/stands")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app.backend.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn pricing_preview_computes_totals_locally() {
    let app = TestApp::spawn().await;

    let response = app
        .post(
            "/api/pricing/preview",
            json!({
                "items": [{ "quantity": 2, "days": 3, "unit_price": 10.0 }],
                "discount": 10.0,
                "discount_type": "percentage",
                "tax_rate": 19.0
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_money(&body["exact"]["subtotal"], 60.0);
    assert_money(&body["exact"]["total_before_tax"], 54.0);
    assert_money(&body["exact"]["tax_amount"], 10.26);
    assert_money(&body["exact"]["total"], 64.26);
    assert!(app.backend.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn pricing_preview_rejects_zero_quantity() {
    let app = TestApp::spawn().await;

    let response = app
        .post(
            "/api/pricing/preview",
            json!({ "items": [{ "quantity": 0, "unit_price": 10.0 }] }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn pricing_preview_rejects_overflowing_amounts() {
    let app = TestApp::spawn().await;

    let response = app
        .post(
            "/api/pricing/preview",
            json!({
                "items": [{ "quantity": 4000000000u32, "days": 4000000000u32, "unit_price": 1e20 }]
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("too large"));
    assert!(app.backend.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn navigation_lists_modules_for_role() {
    let app = TestApp::spawn().await;
    app.login_as("visitor").await;

    let response = app.get("/api/navigation").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["role"], "Visiteur");
    assert_eq!(body["display_name"], "Test User");
    let paths: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"/dashboard"));
    assert!(paths.contains(&"/statistics"));
    assert!(!paths.contains(&"/stand-simulator"));
    assert!(!paths.contains(&"/invoices"));
}

#[tokio::test]
async fn forbidden_role_sends_no_write() {
    let app = TestApp::spawn().await;
    app.login_as("visitor").await;
    Mock::given(method("POST"))
        .and(path("/api/stands"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.backend)
        .await;

    let response = app
        .post(
            "/api/stands",
            json!({ "name": "Stand", "client_id": 4, "items": [{ "product_id": 1, "quantity": 1 }] }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("stand-simulator"));
}

#[tokio::test]
async fn unknown_backend_role_is_forbidden() {
    let app = TestApp::spawn().await;
    app.login_as("janitor").await;

    let response = app.get("/api/statistics").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn products_can_be_filtered_and_grouped() {
    let app = TestApp::spawn().await;
    app.mount_get("/products", common::catalog()).await;

    let response = app.get("/api/products?pricing_type=Forfait").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Moquette");

    let response = app.get("/api/products?group=true&sort=price-desc").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let groups = body.as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["products"][0]["name"], "Moquette");
}
