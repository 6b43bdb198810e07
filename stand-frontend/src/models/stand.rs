//! Stand models.

use super::draft::DraftLineInput;
use super::line_item::LineItemPayload;
use super::status::{StandStatus, TransitionError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Stand as listed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stand {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    pub total_amount: Decimal,
    #[serde(default = "super::default_currency")]
    pub currency: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub items: Vec<StandItem>,
}

impl Stand {
    pub fn stand_status(&self) -> Result<StandStatus, TransitionError> {
        StandStatus::from_string(&self.status)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandItem {
    #[serde(default)]
    pub id: Option<i64>,
    pub product_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub supplier_name: Option<String>,
    pub quantity: u32,
    #[serde(default = "one")]
    pub days: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

fn one() -> u32 {
    1
}

/// Stand simulator submission.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStandRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub client_id: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[validate(length(min = 1), nested)]
    pub items: Vec<DraftLineInput>,
}

/// Body of `PUT /stands/{id}/items`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStandItemsRequest {
    #[validate(length(min = 1), nested)]
    pub items: Vec<DraftLineInput>,
}

/// Stand creation body sent to the backend.
#[derive(Debug, Clone, Serialize)]
pub struct StandPayload {
    pub name: String,
    pub client_id: i64,
    pub description: String,
    pub total_amount: Decimal,
    pub currency: String,
    pub items: Vec<LineItemPayload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StandItemsPayload {
    pub items: Vec<LineItemPayload>,
}

/// Stand confirmed by the backend after creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedStand {
    pub id: i64,
    pub name: String,
    pub total_amount: Decimal,
    pub currency: String,
    pub purchases_created: Option<i64>,
    pub items: Vec<LineItemPayload>,
}

/// Stand state after a validation round trip.
#[derive(Debug, Clone, Serialize)]
pub struct StandValidationOutcome {
    pub id: i64,
    pub previous_status: String,
    pub status: String,
    pub label: &'static str,
    pub invoiceable: bool,
}
