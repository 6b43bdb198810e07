//! Client invoices and quotes.

use super::draft::DraftLineInput;
use super::line_item::LineItemPayload;
use super::status::{InvoiceStatus, TransitionError, remaining_balance};
use crate::services::pricing::{Discount, DiscountKind, Totals};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Invoice (or quote) as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub invoice_number: String,
    #[serde(default)]
    pub stand_id: Option<i64>,
    #[serde(default)]
    pub stand_name: Option<String>,
    #[serde(default)]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub client_phone: Option<String>,
    #[serde(default)]
    pub client_address: Option<String>,
    #[serde(default)]
    pub client_company: Option<String>,
    pub total_ht: Decimal,
    pub tva_amount: Decimal,
    pub total_ttc: Decimal,
    #[serde(default)]
    pub advance_payment: Decimal,
    #[serde(default)]
    pub remise: Decimal,
    #[serde(default)]
    pub remise_type: DiscountKind,
    #[serde(default = "super::default_tax_rate")]
    pub tva_percentage: Decimal,
    #[serde(default = "super::default_currency")]
    pub currency: String,
    #[serde(default)]
    pub timbre_fiscale: Decimal,
    pub status: String,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_address: Option<String>,
    #[serde(default)]
    pub company_phone: Option<String>,
    #[serde(default)]
    pub company_email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub approved_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<i64>,
}

impl Invoice {
    pub fn invoice_status(&self) -> Result<InvoiceStatus, TransitionError> {
        InvoiceStatus::from_string(&self.status)
    }

    pub fn discount(&self) -> Discount {
        Discount::new(self.remise_type, self.remise)
    }

    pub fn remaining(&self) -> Result<Decimal, TransitionError> {
        Ok(remaining_balance(
            self.invoice_status()?,
            self.total_ttc,
            self.advance_payment,
        ))
    }
}

/// Stored invoice line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    #[serde(default)]
    pub id: Option<i64>,
    pub product_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: u32,
    #[serde(default = "one")]
    pub days: u32,
    pub unit_price: Decimal,
    #[serde(default = "decimal_one")]
    pub factor: Decimal,
    pub total_price: Decimal,
    #[serde(default)]
    pub pricing_type: Option<String>,
}

fn one() -> u32 {
    1
}

fn decimal_one() -> Decimal {
    Decimal::ONE
}

/// Invoice with the figures the UI shows next to it.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceView {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub status_label: &'static str,
    pub remaining: Decimal,
    pub editable: bool,
}

impl TryFrom<Invoice> for InvoiceView {
    type Error = TransitionError;

    fn try_from(invoice: Invoice) -> Result<Self, Self::Error> {
        let status = invoice.invoice_status()?;
        let remaining = remaining_balance(status, invoice.total_ttc, invoice.advance_payment);
        Ok(Self {
            invoice,
            status_label: status.label(),
            remaining,
            editable: status.is_editable(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub view: InvoiceView,
    pub items: Vec<InvoiceItem>,
}

/// Quote creation. With a stand the stand's items are used unless lines are
/// given; without one, lines are mandatory.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    #[serde(default)]
    pub stand_id: Option<i64>,
    #[serde(default)]
    pub client_id: Option<i64>,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub client_name: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub client_phone: Option<String>,
    #[serde(default)]
    pub client_address: Option<String>,
    #[serde(default)]
    pub client_company: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "crate::models::non_negative"))]
    pub remise: Option<Decimal>,
    #[serde(default)]
    pub remise_type: DiscountKind,
    #[serde(default)]
    #[validate(custom(function = "crate::models::percentage"))]
    pub tva_percentage: Option<Decimal>,
    #[serde(default)]
    #[validate(custom(function = "crate::models::non_negative"))]
    pub timbre_fiscale: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_address: Option<String>,
    #[serde(default)]
    pub company_phone: Option<String>,
    #[serde(default)]
    pub company_email: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<DraftLineInput>,
}

/// Creation body sent to the backend.
#[derive(Debug, Clone, Serialize)]
pub struct InvoicePayload {
    pub use_stand: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stand_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_company: Option<String>,
    pub remise: Decimal,
    pub remise_type: DiscountKind,
    pub tva_percentage: Decimal,
    pub timbre_fiscale: Decimal,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_email: Option<String>,
    pub modified_items: Vec<LineItemPayload>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateInvoiceItemsRequest {
    #[validate(length(min = 1), nested)]
    pub items: Vec<DraftLineInput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceItemsPayload {
    pub modified_items: Vec<LineItemPayload>,
}

/// Body of the sign and pay actions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdvancePaymentRequest {
    #[serde(default)]
    pub advance_payment: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceStatusPayload {
    pub status: InvoiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advance_payment: Option<Decimal>,
}

/// Quote state confirmed by the backend, with the totals the BFF computed for it.
#[derive(Debug, Clone, Serialize)]
pub struct PricedInvoice {
    pub id: i64,
    pub invoice_number: Option<String>,
    pub status: InvoiceStatus,
    pub status_label: &'static str,
    pub totals: Totals,
    pub rounded: Totals,
    pub items: Vec<LineItemPayload>,
}

impl PricedInvoice {
    pub fn new(
        id: i64,
        invoice_number: Option<String>,
        status: InvoiceStatus,
        totals: Totals,
        items: Vec<LineItemPayload>,
    ) -> Self {
        Self {
            id,
            invoice_number,
            status,
            status_label: status.label(),
            rounded: totals.rounded(),
            totals,
            items,
        }
    }
}
