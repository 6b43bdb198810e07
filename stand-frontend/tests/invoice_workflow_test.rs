mod common;

use axum::http::{header, Method, StatusCode};
use common::{assert_money, body_json, catalog, invoice, stand, TestApp};
use serde_json::json;
use wiremock::matchers::{body_json as body_matches, body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn forbid_writes(app: &TestApp, method_name: &str, route: &str) {
    Mock::given(method(method_name))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.backend)
        .await;
}

#[tokio::test]
async fn quote_from_approved_stand_uses_stand_items() {
    let app = TestApp::spawn().await;
    app.login_as("admin").await;
    app.mount_get("/stands", json!([stand(5, "approved")])).await;
    Mock::given(method("POST"))
        .and(path("/api/invoices"))
        .and(body_partial_json(json!({
            "use_stand": true,
            "stand_id": 5,
            "remise_type": "percentage",
            "currency": "TND"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Devis created successfully",
            "invoice_id": 1,
            "invoice_number": "DEV-2024-0001"
        })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app
        .post(
            "/api/invoices",
            json!({ "stand_id": 5, "client_name": "Expo SARL", "remise": 10.0 }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["invoice_number"], "DEV-2024-0001");
    assert_eq!(body["status"], "devis");
    assert_eq!(body["status_label"], "Devis");
    assert_money(&body["totals"]["subtotal"], 60.0);
    assert_money(&body["totals"]["total_before_tax"], 54.0);
    assert_money(&body["totals"]["tax_amount"], 10.26);
    assert_money(&body["totals"]["total"], 64.26);
}

#[tokio::test]
async fn quote_requires_approved_stand() {
    let app = TestApp::spawn().await;
    app.login_as("commercial").await;
    app.mount_get("/stands", json!([stand(5, "validated_logistics")]))
        .await;
    forbid_writes(&app, "POST", "/api/invoices").await;

    let response = app.post("/api/invoices", json!({ "stand_id": 5 })).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn direct_quote_without_lines_is_rejected() {
    let app = TestApp::spawn().await;
    app.login_as("finance").await;
    forbid_writes(&app, "POST", "/api/invoices").await;

    let response = app
        .post("/api/invoices", json!({ "client_name": "Expo SARL" }))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn discount_over_hundred_percent_is_rejected() {
    let app = TestApp::spawn().await;
    app.login_as("finance").await;
    forbid_writes(&app, "POST", "/api/invoices").await;

    let response = app
        .post(
            "/api/invoices",
            json!({
                "remise": 120.0,
                "remise_type": "percentage",
                "items": [{ "product_id": 1, "quantity": 1 }]
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signing_issues_invoice_with_advance() {
    let app = TestApp::spawn().await;
    app.login_as("finance").await;
    app.mount_get("/invoices/3", invoice(3, "DEV-2024-0003", "devis"))
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/invoices/3"))
        .and(body_matches(json!({ "status": "facture", "advance_payment": 30.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app
        .post("/api/invoices/3/sign", json!({ "advance_payment": 30.0 }))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "facture");
    assert_eq!(body["status_label"], "Facture");
    assert_eq!(body["invoice_number"], "FAC-2024-0003");
    assert_money(&body["remaining"], 34.26);
    assert_eq!(body["editable"], false);
}

#[tokio::test]
async fn advance_above_total_sends_nothing() {
    let app = TestApp::spawn().await;
    app.login_as("admin").await;
    app.mount_get("/invoices/3", invoice(3, "DEV-2024-0003", "devis"))
        .await;
    forbid_writes(&app, "PUT", "/api/invoices/3").await;

    let response = app
        .post("/api/invoices/3/sign", json!({ "advance_payment": 100.0 }))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_advance_sends_nothing() {
    let app = TestApp::spawn().await;
    app.login_as("admin").await;
    app.mount_get("/invoices/3", invoice(3, "DEV-2024-0003", "devis"))
        .await;
    forbid_writes(&app, "PUT", "/api/invoices/3").await;

    let response = app
        .post("/api/invoices/3/sign", json!({ "advance_payment": "thirty" }))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Invalid advance payment"));
}

#[tokio::test]
async fn malformed_pay_body_sends_nothing() {
    let app = TestApp::spawn().await;
    app.login_as("admin").await;
    app.mount_get("/invoices/3", invoice(3, "FAC-2024-0003", "facture"))
        .await;
    forbid_writes(&app, "PUT", "/api/invoices/3").await;

    let response = app
        .send(
            Method::POST,
            "/api/invoices/3/pay",
            Some(json!({ "advance_payment": true })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signing_without_body_records_no_advance() {
    let app = TestApp::spawn().await;
    app.login_as("admin").await;
    app.mount_get("/invoices/3", invoice(3, "DEV-2024-0003", "devis"))
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/invoices/3"))
        .and(body_matches(json!({ "status": "facture", "advance_payment": 0.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app
        .send(Method::POST, "/api/invoices/3/sign", None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "facture");
    assert_money(&body["remaining"], 64.26);
}

#[tokio::test]
async fn overflowing_quote_lines_send_nothing() {
    let app = TestApp::spawn().await;
    app.login_as("admin").await;
    app.mount_get("/invoices/3", invoice(3, "DEV-2024-0003", "devis"))
        .await;
    app.mount_get("/products", catalog()).await;
    forbid_writes(&app, "PUT", "/api/invoices/3").await;

    let response = app
        .put(
            "/api/invoices/3/items",
            json!({ "items": [{
                "product_id": 1,
                "quantity": 4000000000u32,
                "days": 4000000000u32,
                "unit_price": 1e20
            }] }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn paying_keeps_recorded_advance_and_clears_balance() {
    let app = TestApp::spawn().await;
    app.login_as("admin").await;
    let mut issued = invoice(3, "FAC-2024-0003", "facture");
    issued["advance_payment"] = json!(30.0);
    app.mount_get("/invoices/3", issued).await;
    Mock::given(method("PUT"))
        .and(path("/api/invoices/3"))
        .and(body_matches(json!({ "status": "paid", "advance_payment": 30.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app.post("/api/invoices/3/pay", json!({})).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "paid");
    assert_money(&body["remaining"], 0.0);
}

#[tokio::test]
async fn paid_invoice_cannot_be_cancelled() {
    let app = TestApp::spawn().await;
    app.login_as("admin").await;
    app.mount_get("/invoices/3", invoice(3, "FAC-2024-0003", "paid"))
        .await;
    forbid_writes(&app, "PUT", "/api/invoices/3").await;

    let response = app.post("/api/invoices/3/cancel", json!({})).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn quote_can_be_cancelled() {
    let app = TestApp::spawn().await;
    app.login_as("commercial").await;
    app.mount_get("/invoices/3", invoice(3, "DEV-2024-0003", "devis"))
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/invoices/3"))
        .and(body_matches(json!({ "status": "cancelled" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app.post("/api/invoices/3/cancel", json!({})).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "cancelled");
    assert_eq!(body["status_label"], "Annulée");
}

#[tokio::test]
async fn failed_status_write_returns_no_state() {
    let app = TestApp::spawn().await;
    app.login_as("admin").await;
    app.mount_get("/invoices/3", invoice(3, "DEV-2024-0003", "devis"))
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/invoices/3"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "Invoice locked" })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app.post("/api/invoices/3/sign", json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invoice locked");
    assert!(body.get("status").is_none());
}

#[tokio::test]
async fn issued_invoice_lines_are_frozen() {
    let app = TestApp::spawn().await;
    app.login_as("admin").await;
    app.mount_get("/invoices/3", invoice(3, "FAC-2024-0003", "facture"))
        .await;
    forbid_writes(&app, "PUT", "/api/invoices/3").await;

    let response = app
        .put(
            "/api/invoices/3/items",
            json!({ "items": [{ "product_id": 1, "quantity": 1 }] }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invoice_list_skips_unknown_statuses() {
    let app = TestApp::spawn().await;
    app.login_as("finance").await;
    app.mount_get(
        "/invoices",
        json!([
            invoice(1, "DEV-2024-0001", "devis"),
            invoice(2, "XXX-2024-0002", "archived")
        ]),
    )
    .await;

    let response = app.get("/api/invoices").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let invoices = body.as_array().unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0]["editable"], true);
    assert_money(&invoices[0]["remaining"], 64.26);
}

#[tokio::test]
async fn invoice_pdf_is_named_after_invoice() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/invoices/3/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
        .mount(&app.backend)
        .await;

    let response = app.get("/api/invoices/3/pdf").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"facture_client_3.pdf\""
    );
}
