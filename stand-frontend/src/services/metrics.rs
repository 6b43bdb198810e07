//! Prometheus metrics for stand-frontend.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};

/// HTTP request counter by method, matched path and status.
pub static HTTP_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "stand_frontend_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register http_requests_total")
});

pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "stand_frontend_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path", "status"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to register http_request_duration")
});

/// Round trips to the REST backend by operation.
pub static BACKEND_CALL_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "stand_frontend_backend_call_duration_seconds",
        "REST backend call duration in seconds",
        &["operation"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register backend_call_duration")
});

pub static BACKEND_ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "stand_frontend_backend_errors_total",
        "Total number of failed backend calls",
        &["operation", "kind"]
    )
    .expect("Failed to register backend_errors_total")
});

/// Confirmed document moves, e.g. invoice devis -> facture.
pub static DOCUMENT_TRANSITIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "stand_frontend_document_transitions_total",
        "Total number of confirmed document status changes",
        &["document", "from", "to"]
    )
    .expect("Failed to register document_transitions_total")
});

/// Requests refused before reaching the backend.
pub static VALIDATION_REJECTIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "stand_frontend_validation_rejections_total",
        "Total number of requests rejected locally",
        &["operation", "kind"]
    )
    .expect("Failed to register validation_rejections_total")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&HTTP_REQUESTS_TOTAL);
    Lazy::force(&HTTP_REQUEST_DURATION);
    Lazy::force(&BACKEND_CALL_DURATION);
    Lazy::force(&BACKEND_ERRORS_TOTAL);
    Lazy::force(&DOCUMENT_TRANSITIONS_TOTAL);
    Lazy::force(&VALIDATION_REJECTIONS_TOTAL);
}

pub fn record_transition(document: &str, from: &str, to: &str) {
    DOCUMENT_TRANSITIONS_TOTAL
        .with_label_values(&[document, from, to])
        .inc();
}

pub fn record_rejection(operation: &str, kind: &str) {
    VALIDATION_REJECTIONS_TOTAL
        .with_label_values(&[operation, kind])
        .inc();
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
