//! Priced line items shared by stands, purchase orders and invoices.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stand_core::error::AppError;
use thiserror::Error;

/// A computed amount does not fit in a decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Amount is too large to compute")]
pub struct AmountOverflow;

impl From<AmountOverflow> for AppError {
    fn from(err: AmountOverflow) -> Self {
        AppError::BadRequest(anyhow::Error::new(err))
    }
}

/// How a catalog product is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingType {
    /// Billed per rental day ("Par Jour").
    PerDay,
    /// Flat rate for the whole event.
    Flat,
}

impl PricingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingType::PerDay => "Par Jour",
            PricingType::Flat => "Forfait",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "Par Jour" => PricingType::PerDay,
            _ => PricingType::Flat,
        }
    }
}

/// One priced line. The line total is always derived from its factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: i64,
    pub quantity: u32,
    pub days: u32,
    pub unit_price: Decimal,
    pub factor: Decimal,
}

impl LineItem {
    pub fn new(product_id: i64, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            product_id,
            quantity,
            days: 1,
            unit_price,
            factor: Decimal::ONE,
        }
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    pub fn with_factor(mut self, factor: Decimal) -> Self {
        self.factor = factor;
        self
    }

    /// quantity × days × unit price × factor
    pub fn line_total(&self) -> Result<Decimal, AmountOverflow> {
        Decimal::from(self.quantity)
            .checked_mul(Decimal::from(self.days))
            .and_then(|amount| amount.checked_mul(self.unit_price))
            .and_then(|amount| amount.checked_mul(self.factor))
            .ok_or(AmountOverflow)
    }
}

/// Line representation understood by the REST backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemPayload {
    pub product_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub quantity: u32,
    pub days: u32,
    pub unit_price: Decimal,
    pub factor: Decimal,
    pub total_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_type: Option<String>,
}
