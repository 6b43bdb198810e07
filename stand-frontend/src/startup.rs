use crate::handlers::{
    app::health_check, catalog, contacts, invoices, metrics::metrics, navigation::navigation_menu,
    pricing::preview, purchases, stands, statistics::dashboard,
};
use crate::middleware::metrics_middleware;
use crate::AppState;
use axum::{
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use stand_core::middleware::request_id_middleware;
use stand_core::observability::REQUEST_ID_HEADER;
use tower_http::trace::TraceLayer;

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/pricing/preview", post(preview))
        .route("/navigation", get(navigation_menu))
        .route("/statistics", get(dashboard))
        // contacts
        .route(
            "/contacts",
            get(contacts::list_contacts).post(contacts::create_contact),
        )
        .route("/contacts/enterprises", get(contacts::list_enterprises))
        .route(
            "/contacts/enterprises/:id/employees",
            get(contacts::list_employees),
        )
        .route(
            "/contacts/:id",
            put(contacts::update_contact).delete(contacts::delete_contact),
        )
        // catalog
        .route(
            "/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route(
            "/categories/:id",
            put(catalog::update_category).delete(catalog::delete_category),
        )
        .route(
            "/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route(
            "/products/:id",
            put(catalog::update_product).delete(catalog::delete_product),
        )
        // stands
        .route("/stands", get(stands::list_stands).post(stands::create_stand))
        .route("/stands/:id/items", put(stands::replace_items))
        .route(
            "/stands/:id/validate-logistics",
            post(stands::validate_logistics),
        )
        .route("/stands/:id/validate-finance", post(stands::validate_finance))
        // purchase orders
        .route(
            "/purchases",
            get(purchases::list_purchases).post(purchases::create_purchase),
        )
        .route("/purchases/:id/status", post(purchases::change_status))
        .route("/purchases/:id/pdf", get(purchases::download_pdf))
        // invoicing
        .route(
            "/invoices",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route("/invoices/:id", get(invoices::get_invoice))
        .route("/invoices/:id/items", put(invoices::update_items))
        .route("/invoices/:id/sign", post(invoices::sign_invoice))
        .route("/invoices/:id/pay", post(invoices::pay_invoice))
        .route("/invoices/:id/cancel", post(invoices::cancel_invoice))
        .route("/invoices/:id/pdf", get(invoices::download_pdf))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .nest("/api", api_routes())
        // route_layer so MatchedPath is available to the metrics labels
        .route_layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
