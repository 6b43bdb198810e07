//! Domain models for stand-frontend.

pub mod catalog;
pub mod contact;
pub mod draft;
pub mod invoice;
pub mod line_item;
pub mod purchase;
pub mod stand;
pub mod status;
pub mod user;

pub use catalog::{Category, CategoryGroup, CategoryInput, Product, ProductInput, ProductQuery, ProductSort};
pub use contact::{Contact, ContactFilter, ContactInput, ContactNature, ContactType};
pub use draft::{DocumentDraft, DraftError, DraftLine, DraftLineInput};
pub use invoice::{
    AdvancePaymentRequest, CreateInvoiceRequest, Invoice, InvoiceDetail, InvoiceItem,
    InvoiceItemsPayload, InvoicePayload, InvoiceStatusPayload, InvoiceView, PricedInvoice,
    UpdateInvoiceItemsRequest,
};
pub use line_item::{AmountOverflow, LineItem, LineItemPayload, PricingType};
pub use purchase::{
    CreatePurchaseRequest, CreatedPurchase, Purchase, PurchasePayload, PurchaseStatusChange,
    PurchaseStatusPayload, PurchaseStatusRequest,
};
pub use stand::{
    CreateStandRequest, CreatedStand, Stand, StandItem, StandItemsPayload, StandPayload,
    StandValidationOutcome, UpdateStandItemsRequest,
};
pub use status::{
    InvoiceStatus, PurchaseStatus, StandStatus, StandValidation, TransitionError, check_advance,
    remaining_balance,
};
pub use user::{Module, NavigationItem, Role, User, navigation};

use rust_decimal::Decimal;
use validator::ValidationError;

pub(crate) fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("negative"));
    }
    Ok(())
}

pub(crate) fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("not_positive"));
    }
    Ok(())
}

pub(crate) fn percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::new("out_of_range"));
    }
    Ok(())
}

pub(crate) fn default_currency() -> String {
    "TND".to_string()
}

pub(crate) fn default_tax_rate() -> Decimal {
    Decimal::from(19)
}
