//! Document totals: subtotal -> discount -> VAT -> total, plus the fiscal stamp.
//!
//! Everything is computed on unrounded decimals. Rounding to two places only
//! happens through [`Totals::rounded`] when figures are shown.

use crate::models::{AmountOverflow, LineItem};
use anyhow::anyhow;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use stand_core::error::AppError;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    #[default]
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Discount {
    pub kind: DiscountKind,
    pub value: Decimal,
}

impl Discount {
    pub fn new(kind: DiscountKind, value: Decimal) -> Self {
        Self { kind, value }
    }

    pub fn none() -> Self {
        Self::new(DiscountKind::Percentage, Decimal::ZERO)
    }

    pub fn percentage(value: Decimal) -> Self {
        Self::new(DiscountKind::Percentage, value)
    }

    pub fn fixed(value: Decimal) -> Self {
        Self::new(DiscountKind::Fixed, value)
    }

    /// Amount taken off `subtotal`, kept within `[0, subtotal]`.
    pub fn amount_on(&self, subtotal: Decimal) -> Result<Decimal, AmountOverflow> {
        let raw = match self.kind {
            DiscountKind::Percentage => percent_of(subtotal, self.value)?,
            DiscountKind::Fixed => self.value,
        };
        Ok(raw.max(Decimal::ZERO).min(subtotal.max(Decimal::ZERO)))
    }

    /// Input check: no negative discount, percentages at most 100.
    pub fn check(&self) -> Result<(), AppError> {
        if self.value < Decimal::ZERO {
            return Err(AppError::BadRequest(anyhow!("Discount cannot be negative")));
        }
        if self.kind == DiscountKind::Percentage && self.value > Decimal::ONE_HUNDRED {
            return Err(AppError::BadRequest(anyhow!(
                "Percentage discount must be between 0 and 100"
            )));
        }
        Ok(())
    }
}

impl Default for Discount {
    fn default() -> Self {
        Self::none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub total_before_tax: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    pub fiscal_stamp: Decimal,
    pub amount_payable: Decimal,
}

impl Totals {
    /// Add a fixed per-document stamp after tax. `total` is untouched.
    pub fn with_fiscal_stamp(mut self, stamp: Decimal) -> Result<Self, AmountOverflow> {
        self.fiscal_stamp = stamp;
        self.amount_payable = self.total.checked_add(stamp).ok_or(AmountOverflow)?;
        Ok(self)
    }

    /// Copy rounded to two decimals, midpoint away from zero.
    pub fn rounded(&self) -> Self {
        let round = |value: Decimal| value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            subtotal: round(self.subtotal),
            discount_amount: round(self.discount_amount),
            total_before_tax: round(self.total_before_tax),
            tax_amount: round(self.tax_amount),
            total: round(self.total),
            fiscal_stamp: round(self.fiscal_stamp),
            amount_payable: round(self.amount_payable),
        }
    }
}

fn percent_of(amount: Decimal, rate: Decimal) -> Result<Decimal, AmountOverflow> {
    amount
        .checked_mul(rate)
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(AmountOverflow)
}

/// Totals for a slice of lines. An empty slice yields all zeros.
///
/// Fails instead of panicking when any intermediate amount overflows.
pub fn calculate_totals(
    items: &[LineItem],
    discount: Discount,
    tax_rate: Decimal,
) -> Result<Totals, AmountOverflow> {
    let subtotal = items.iter().try_fold(Decimal::ZERO, |sum, item| {
        sum.checked_add(item.line_total()?).ok_or(AmountOverflow)
    })?;
    let discount_amount = discount.amount_on(subtotal)?;
    let total_before_tax = subtotal.checked_sub(discount_amount).ok_or(AmountOverflow)?;
    let tax_amount = percent_of(total_before_tax, tax_rate)?;
    let total = total_before_tax.checked_add(tax_amount).ok_or(AmountOverflow)?;

    Ok(Totals {
        subtotal,
        discount_amount,
        total_before_tax,
        tax_amount,
        total,
        fiscal_stamp: Decimal::ZERO,
        amount_payable: total,
    })
}

/// Line of a pricing preview. Nothing is looked up, the caller gives the price.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PreviewLine {
    #[serde(default)]
    pub product_id: Option<i64>,
    #[validate(range(min = 1))]
    pub quantity: u32,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub days: Option<u32>,
    #[validate(custom(function = "crate::models::non_negative"))]
    pub unit_price: Decimal,
    #[serde(default)]
    #[validate(custom(function = "crate::models::positive"))]
    pub factor: Option<Decimal>,
}

impl PreviewLine {
    pub fn line_item(&self) -> LineItem {
        LineItem::new(self.product_id.unwrap_or_default(), self.quantity, self.unit_price)
            .with_days(self.days.unwrap_or(1))
            .with_factor(self.factor.unwrap_or(Decimal::ONE))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PricingPreviewRequest {
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<PreviewLine>,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub discount_type: DiscountKind,
    #[serde(default)]
    #[validate(custom(function = "crate::models::percentage"))]
    pub tax_rate: Option<Decimal>,
    #[serde(default)]
    #[validate(custom(function = "crate::models::non_negative"))]
    pub fiscal_stamp: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PricingPreview {
    pub exact: Totals,
    pub rounded: Totals,
}
