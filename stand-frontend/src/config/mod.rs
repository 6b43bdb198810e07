use rust_decimal::Decimal;
use serde::Deserialize;
use stand_core::config::{ObservabilitySettings, ServerSettings};
use stand_core::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub backend: BackendSettings,
    pub observability: ObservabilitySettings,
    #[serde(default)]
    pub pricing: PricingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    /// Base URL of the REST backend, including the `/api` prefix.
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Defaults applied to new quotes when the caller leaves them out.
#[derive(Debug, Deserialize, Clone)]
pub struct PricingSettings {
    #[serde(default = "default_tax_rate")]
    pub default_tax_rate: Decimal,
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            default_tax_rate: default_tax_rate(),
            default_currency: default_currency(),
        }
    }
}

fn default_tax_rate() -> Decimal {
    Decimal::from(19)
}

fn default_currency() -> String {
    "TND".to_string()
}

pub fn get_configuration() -> Result<Settings, AppError> {
    stand_core::config::load("stand-frontend")
}
