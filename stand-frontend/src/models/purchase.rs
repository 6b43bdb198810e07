//! Purchase orders (bons de commande).

use super::draft::DraftLineInput;
use super::line_item::LineItemPayload;
use super::status::{PurchaseStatus, TransitionError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    pub id: i64,
    #[serde(default)]
    pub purchase_number: Option<String>,
    #[serde(default)]
    pub stand_name: Option<String>,
    #[serde(default)]
    pub supplier_name: Option<String>,
    pub total_amount: Decimal,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
}

impl Purchase {
    pub fn purchase_status(&self) -> Result<PurchaseStatus, TransitionError> {
        PurchaseStatus::from_string(&self.status)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePurchaseRequest {
    pub supplier_id: Option<i64>,
    #[serde(default)]
    pub stand_id: Option<i64>,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    #[validate(length(min = 1), nested)]
    pub items: Vec<DraftLineInput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchasePayload {
    pub supplier_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stand_id: Option<i64>,
    pub total_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<LineItemPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseStatusRequest {
    pub status: PurchaseStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseStatusPayload {
    pub status: PurchaseStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedPurchase {
    pub id: i64,
    pub purchase_number: Option<String>,
    pub status: PurchaseStatus,
    pub total_amount: Decimal,
    pub items: Vec<LineItemPayload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseStatusChange {
    pub id: i64,
    pub previous_status: PurchaseStatus,
    pub status: PurchaseStatus,
    pub label: &'static str,
}
