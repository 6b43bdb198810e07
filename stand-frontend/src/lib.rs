pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use config::PricingSettings;
use services::backend_client::BackendClient;
use std::sync::Arc;

/// Shared application state: the backend client and pricing defaults.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<BackendClient>,
    pub pricing: PricingSettings,
}

impl AppState {
    pub fn new(backend: Arc<BackendClient>, pricing: PricingSettings) -> Self {
        Self { backend, pricing }
    }
}
