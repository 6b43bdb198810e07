//! Document lifecycles.
//!
//! Each document type has a closed set of states and an explicit table of the
//! moves it accepts. The backend stores the state as a plain string; the enums
//! here are the only place where moves are decided.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stand_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError {
    #[error("Unknown {document} status '{status}'")]
    UnknownStatus {
        document: &'static str,
        status: String,
    },

    #[error("A {document} cannot move from '{from}' to '{to}'")]
    NotAllowed {
        document: &'static str,
        from: &'static str,
        to: &'static str,
    },

    #[error("Advance payment {advance} must be between 0 and {limit}")]
    InvalidAdvance { advance: Decimal, limit: Decimal },

    #[error("The {side} validation has already been recorded")]
    AlreadyValidated { side: &'static str },
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::InvalidAdvance { .. } => AppError::BadRequest(anyhow::Error::new(err)),
            TransitionError::UnknownStatus { .. } => AppError::BadGateway(err.to_string()),
            TransitionError::NotAllowed { .. } | TransitionError::AlreadyValidated { .. } => {
                AppError::InvalidTransition(err.to_string())
            }
        }
    }
}

/// Invoice lifecycle: quote (devis) -> issued (facture) -> paid, with
/// cancellation from quote or issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus {
    #[serde(rename = "devis")]
    Quote,
    #[serde(rename = "facture")]
    Issued,
    #[serde(rename = "paid")]
    Paid,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Quote => "devis",
            InvoiceStatus::Issued => "facture",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, TransitionError> {
        match s {
            "devis" => Ok(InvoiceStatus::Quote),
            "facture" => Ok(InvoiceStatus::Issued),
            "paid" => Ok(InvoiceStatus::Paid),
            "cancelled" => Ok(InvoiceStatus::Cancelled),
            other => Err(TransitionError::UnknownStatus {
                document: "invoice",
                status: other.to_string(),
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Quote => "Devis",
            InvoiceStatus::Issued => "Facture",
            InvoiceStatus::Paid => "Payée",
            InvoiceStatus::Cancelled => "Annulée",
        }
    }

    pub fn can_transition_to(&self, next: InvoiceStatus) -> bool {
        use InvoiceStatus::*;
        matches!(
            (self, next),
            (Quote, Issued) | (Quote, Cancelled) | (Issued, Paid) | (Issued, Cancelled)
        )
    }

    pub fn transition(self, next: InvoiceStatus) -> Result<InvoiceStatus, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError::NotAllowed {
                document: "invoice",
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }

    /// Line items may only be edited while the document is still a quote.
    pub fn is_editable(&self) -> bool {
        *self == InvoiceStatus::Quote
    }
}

/// Amount still owed on an invoice. A paid invoice owes nothing whatever
/// advance was recorded.
pub fn remaining_balance(status: InvoiceStatus, total: Decimal, advance: Decimal) -> Decimal {
    if status == InvoiceStatus::Paid {
        return Decimal::ZERO;
    }
    total.saturating_sub(advance).max(Decimal::ZERO)
}

/// An advance must lie in `[0, limit]`.
pub fn check_advance(advance: Decimal, limit: Decimal) -> Result<(), TransitionError> {
    if advance < Decimal::ZERO || advance > limit {
        return Err(TransitionError::InvalidAdvance { advance, limit });
    }
    Ok(())
}

/// Purchase order lifecycle, forward only: pending -> approved -> sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    Pending,
    Approved,
    Sent,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Approved => "approved",
            PurchaseStatus::Sent => "sent",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, TransitionError> {
        match s {
            "pending" => Ok(PurchaseStatus::Pending),
            "approved" => Ok(PurchaseStatus::Approved),
            "sent" => Ok(PurchaseStatus::Sent),
            other => Err(TransitionError::UnknownStatus {
                document: "purchase order",
                status: other.to_string(),
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "En attente",
            PurchaseStatus::Approved => "Approuvé",
            PurchaseStatus::Sent => "Envoyé",
        }
    }

    pub fn next(&self) -> Option<PurchaseStatus> {
        match self {
            PurchaseStatus::Pending => Some(PurchaseStatus::Approved),
            PurchaseStatus::Approved => Some(PurchaseStatus::Sent),
            PurchaseStatus::Sent => None,
        }
    }

    pub fn can_transition_to(&self, next: PurchaseStatus) -> bool {
        self.next() == Some(next)
    }

    pub fn transition(self, next: PurchaseStatus) -> Result<PurchaseStatus, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError::NotAllowed {
                document: "purchase order",
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }
}

/// Stand lifecycle driven by the logistics and finance sign-offs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandStatus {
    Draft,
    ValidatedLogistics,
    ValidatedFinance,
    Approved,
}

/// Which department signs off a stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandValidation {
    Logistics,
    Finance,
}

impl StandValidation {
    pub fn as_str(&self) -> &'static str {
        match self {
            StandValidation::Logistics => "logistics",
            StandValidation::Finance => "finance",
        }
    }
}

impl StandStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StandStatus::Draft => "draft",
            StandStatus::ValidatedLogistics => "validated_logistics",
            StandStatus::ValidatedFinance => "validated_finance",
            StandStatus::Approved => "approved",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, TransitionError> {
        match s {
            "draft" => Ok(StandStatus::Draft),
            "validated_logistics" => Ok(StandStatus::ValidatedLogistics),
            "validated_finance" => Ok(StandStatus::ValidatedFinance),
            "approved" => Ok(StandStatus::Approved),
            other => Err(TransitionError::UnknownStatus {
                document: "stand",
                status: other.to_string(),
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StandStatus::Draft => "📝 Brouillon",
            StandStatus::ValidatedLogistics => "📦 Validé Logistique",
            StandStatus::ValidatedFinance => "💰 Validé Finance",
            StandStatus::Approved => "✅ Approuvé",
        }
    }

    /// State reached once `validation` is recorded.
    pub fn validate(self, validation: StandValidation) -> Result<StandStatus, TransitionError> {
        use StandStatus::*;
        use StandValidation::*;
        match (self, validation) {
            (Draft, Logistics) => Ok(ValidatedLogistics),
            (Draft, Finance) => Ok(ValidatedFinance),
            (ValidatedFinance, Logistics) | (ValidatedLogistics, Finance) => Ok(Approved),
            (ValidatedLogistics, Logistics) | (ValidatedFinance, Finance) | (Approved, _) => {
                Err(TransitionError::AlreadyValidated {
                    side: validation.as_str(),
                })
            }
        }
    }

    pub fn is_invoiceable(&self) -> bool {
        *self == StandStatus::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invoice_happy_path() {
        let issued = InvoiceStatus::Quote.transition(InvoiceStatus::Issued).unwrap();
        let paid = issued.transition(InvoiceStatus::Paid).unwrap();
        assert_eq!(paid, InvoiceStatus::Paid);
    }

    #[test]
    fn test_cancellation_only_before_payment() {
        assert!(InvoiceStatus::Quote.can_transition_to(InvoiceStatus::Cancelled));
        assert!(InvoiceStatus::Issued.can_transition_to(InvoiceStatus::Cancelled));
        assert!(InvoiceStatus::Paid.transition(InvoiceStatus::Cancelled).is_err());
        assert!(InvoiceStatus::Cancelled.transition(InvoiceStatus::Cancelled).is_err());
    }

    #[test]
    fn test_quote_cannot_skip_to_paid() {
        let err = InvoiceStatus::Quote.transition(InvoiceStatus::Paid).unwrap_err();
        assert_eq!(
            err,
            TransitionError::NotAllowed {
                document: "invoice",
                from: "devis",
                to: "paid",
            }
        );
    }

    #[test]
    fn test_remaining_balance() {
        assert_eq!(
            remaining_balance(InvoiceStatus::Issued, dec!(64.26), dec!(30)),
            dec!(34.26)
        );
        assert_eq!(
            remaining_balance(InvoiceStatus::Paid, dec!(64.26), dec!(30)),
            Decimal::ZERO
        );
        assert_eq!(
            remaining_balance(InvoiceStatus::Issued, dec!(10), dec!(25)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_advance_bounds() {
        assert!(check_advance(dec!(0), dec!(64.26)).is_ok());
        assert!(check_advance(dec!(64.26), dec!(64.26)).is_ok());
        assert!(check_advance(dec!(64.27), dec!(64.26)).is_err());
        assert!(check_advance(dec!(-1), dec!(64.26)).is_err());
    }

    #[test]
    fn test_invoice_wire_tags() {
        for status in [
            InvoiceStatus::Quote,
            InvoiceStatus::Issued,
            InvoiceStatus::Paid,
            InvoiceStatus::Cancelled,
        ] {
            assert_eq!(InvoiceStatus::from_string(status.as_str()).unwrap(), status);
        }
        assert!(InvoiceStatus::from_string("pending").is_err());
        assert_eq!(
            serde_json::to_string(&InvoiceStatus::Quote).unwrap(),
            "\"devis\""
        );
    }

    #[test]
    fn test_purchase_orders_move_forward_one_step() {
        assert!(PurchaseStatus::Pending.transition(PurchaseStatus::Approved).is_ok());
        assert!(PurchaseStatus::Approved.transition(PurchaseStatus::Sent).is_ok());
        assert!(PurchaseStatus::Pending.transition(PurchaseStatus::Sent).is_err());
        assert!(PurchaseStatus::Sent.transition(PurchaseStatus::Approved).is_err());
        assert!(PurchaseStatus::Approved.transition(PurchaseStatus::Approved).is_err());
        assert_eq!(PurchaseStatus::Sent.next(), None);
    }

    #[test]
    fn test_stand_validations_converge() {
        let logistics_first = StandStatus::Draft
            .validate(StandValidation::Logistics)
            .and_then(|s| s.validate(StandValidation::Finance))
            .unwrap();
        let finance_first = StandStatus::Draft
            .validate(StandValidation::Finance)
            .and_then(|s| s.validate(StandValidation::Logistics))
            .unwrap();
        assert_eq!(logistics_first, StandStatus::Approved);
        assert_eq!(finance_first, StandStatus::Approved);
        assert!(logistics_first.is_invoiceable());
    }

    #[test]
    fn test_stand_validation_is_not_repeated() {
        let err = StandStatus::ValidatedLogistics
            .validate(StandValidation::Logistics)
            .unwrap_err();
        assert_eq!(err, TransitionError::AlreadyValidated { side: "logistics" });
        assert!(StandStatus::Approved.validate(StandValidation::Finance).is_err());
    }

    #[test]
    fn test_transition_errors_map_to_app_errors() {
        let err: AppError = TransitionError::AlreadyValidated { side: "finance" }.into();
        assert_eq!(err.kind(), "invalid_transition");

        let err: AppError = TransitionError::InvalidAdvance {
            advance: dec!(100),
            limit: dec!(10),
        }
        .into();
        assert_eq!(err.kind(), "bad_request");
    }
}
