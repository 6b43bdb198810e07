//! Shared setup for stand-frontend integration tests.
//!
//! Each test gets its own wiremock server standing in for the REST backend
//! and a router wired to it.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use stand_frontend::config::{BackendSettings, PricingSettings};
use stand_frontend::services::backend_client::BackendClient;
use stand_frontend::services::metrics::init_metrics;
use stand_frontend::startup::build_router;
use stand_frontend::AppState;
use std::sync::{Arc, Once};
use tower::util::ServiceExt;
use wiremock::matchers::{header as header_matcher, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-token";
pub const BEARER: &str = "Bearer test-token";

static TRACING: Once = Once::new();

fn init_test_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("warn")
            .with_test_writer()
            .try_init();
    });
}

pub struct TestApp {
    pub backend: MockServer,
    pub router: Router,
}

impl TestApp {
    pub async fn spawn() -> Self {
        init_test_tracing();
        init_metrics();

        let backend = MockServer::start().await;
        let settings = BackendSettings {
            base_url: format!("{}/api", backend.uri()),
            timeout_seconds: 5,
        };
        let client = BackendClient::new(&settings).expect("Failed to build backend client");
        let router = build_router(AppState::new(Arc::new(client), PricingSettings::default()));

        Self { backend, router }
    }

    /// Answer `/auth/me` with a user holding `role`.
    pub async fn login_as(&self, role: &str) {
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .and(header_matcher("authorization", BEARER))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 7,
                "name": "Test User",
                "email": "test@stand.tn",
                "role": role
            })))
            .mount(&self.backend)
            .await;
    }

    pub async fn mount_get(&self, route: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/api{}", route)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.backend)
            .await;
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, BEARER);

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Response<Body> {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Response<Body> {
        self.send(Method::PUT, uri, Some(body)).await
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn product(id: i64, name: &str, price: f64, pricing_type: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "category_id": 1,
        "category_name": "Mobilier",
        "supplier_id": 3,
        "supplier_name": "Meubles SA",
        "unit": "pièce",
        "price": price,
        "pricing_type": pricing_type
    })
}

pub fn catalog() -> Value {
    json!([
        product(1, "Chaise", 10.0, "Par Jour"),
        product(2, "Moquette", 100.0, "Forfait"),
    ])
}

pub fn stand(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "name": "Stand Expo",
        "status": status,
        "total_amount": 60.0,
        "currency": "TND",
        "items": [{
            "product_id": 1,
            "product_name": "Chaise",
            "quantity": 2,
            "days": 3,
            "unit_price": 10.0,
            "total_price": 60.0
        }]
    })
}

pub fn invoice(id: i64, number: &str, status: &str) -> Value {
    json!({
        "id": id,
        "invoice_number": number,
        "total_ht": 54.0,
        "tva_amount": 10.26,
        "total_ttc": 64.26,
        "advance_payment": 0.0,
        "remise": 10.0,
        "remise_type": "percentage",
        "tva_percentage": 19.0,
        "currency": "TND",
        "timbre_fiscale": 0.0,
        "status": status
    })
}

/// Money travels as JSON floats; compare with a tolerance.
pub fn assert_money(value: &Value, expected: f64) {
    let actual = value
        .as_f64()
        .unwrap_or_else(|| panic!("expected a number, got {}", value));
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
