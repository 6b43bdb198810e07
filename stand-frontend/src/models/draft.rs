//! Document drafts: the cart-like editor behind the stand simulator, the
//! purchase form and the invoice editor.
//!
//! A draft is edited line by line and only reaches the backend once, as a
//! single create (or item replacement) request.

use super::catalog::Product;
use super::line_item::{AmountOverflow, LineItem, LineItemPayload, PricingType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stand_core::error::AppError;
use thiserror::Error;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    #[error("Product {0} does not exist")]
    UnknownProduct(i64),

    #[error("Product {0} is not part of this document")]
    NotInDraft(i64),

    #[error("Factor must be greater than zero, got {0}")]
    InvalidFactor(Decimal),

    #[error("Unit price cannot be negative, got {0}")]
    NegativePrice(Decimal),

    #[error("A document needs at least one item")]
    Empty,

    #[error("A document needs a name")]
    MissingName,

    #[error("A document needs a client or supplier")]
    MissingCounterparty,

    #[error("Quantity of product {0} is too large")]
    QuantityOverflow(i64),

    #[error(transparent)]
    Amount(#[from] AmountOverflow),
}

impl From<DraftError> for AppError {
    fn from(err: DraftError) -> Self {
        AppError::BadRequest(anyhow::Error::new(err))
    }
}

/// One line of a draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftLine {
    pub product_id: i64,
    pub product_name: String,
    #[serde(skip)]
    pub pricing: PricingType,
    pub quantity: u32,
    pub days: u32,
    pub unit_price: Decimal,
    pub factor: Decimal,
}

impl DraftLine {
    fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            pricing: product.pricing(),
            quantity: 1,
            days: 1,
            unit_price: product.price,
            factor: Decimal::ONE,
        }
    }

    pub fn line_item(&self) -> LineItem {
        LineItem::new(self.product_id, self.quantity, self.unit_price)
            .with_days(self.days)
            .with_factor(self.factor)
    }

    pub fn payload(&self) -> Result<LineItemPayload, AmountOverflow> {
        let item = self.line_item();
        Ok(LineItemPayload {
            product_id: self.product_id,
            product_name: Some(self.product_name.clone()),
            quantity: self.quantity,
            days: self.days,
            unit_price: self.unit_price,
            factor: self.factor,
            total_price: item.line_total()?,
            pricing_type: Some(self.pricing.as_str().to_string()),
        })
    }
}

/// A line as submitted by the UI. Totals are never taken from the caller.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DraftLineInput {
    pub product_id: i64,
    #[validate(range(min = 1))]
    pub quantity: u32,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub days: Option<u32>,
    #[serde(default)]
    #[validate(custom(function = "crate::models::positive"))]
    pub factor: Option<Decimal>,
    #[serde(default)]
    #[validate(custom(function = "crate::models::non_negative"))]
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentDraft {
    lines: Vec<DraftLine>,
}

impl DocumentDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a draft from submitted lines, pricing each one from the catalog.
    /// Repeated products are merged into a single line.
    pub fn build(inputs: &[DraftLineInput], catalog: &[Product]) -> Result<Self, DraftError> {
        let mut draft = Self::new();

        for input in inputs {
            let product = catalog
                .iter()
                .find(|p| p.id == input.product_id)
                .ok_or(DraftError::UnknownProduct(input.product_id))?;

            let quantity = draft
                .quantity_of(product.id)
                .checked_add(input.quantity)
                .ok_or(DraftError::QuantityOverflow(product.id))?;
            draft.add_product(product);
            draft.set_quantity(product.id, quantity)?;

            if let Some(days) = input.days {
                draft.set_days(product.id, days)?;
            }
            if let Some(factor) = input.factor {
                draft.set_factor(product.id, factor)?;
            }
            if let Some(price) = input.unit_price {
                draft.set_unit_price(product.id, price)?;
            }
        }

        Ok(draft)
    }

    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn quantity_of(&self, product_id: i64) -> u32 {
        self.lines
            .iter()
            .find(|line| line.product_id == product_id)
            .map_or(0, |line| line.quantity)
    }

    fn line_mut(&mut self, product_id: i64) -> Result<&mut DraftLine, DraftError> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
            .ok_or(DraftError::NotInDraft(product_id))
    }

    /// Append the product with quantity 1, or bump its quantity if present.
    pub fn add_product(&mut self, product: &Product) {
        match self.lines.iter_mut().find(|line| line.product_id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(DraftLine::from_product(product)),
        }
    }

    pub fn remove_product(&mut self, product_id: i64) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        self.lines.len() != before
    }

    pub fn set_quantity(&mut self, product_id: i64, quantity: u32) -> Result<(), DraftError> {
        self.line_mut(product_id)?.quantity = quantity.max(1);
        Ok(())
    }

    pub fn adjust_quantity(&mut self, product_id: i64, delta: i64) -> Result<(), DraftError> {
        let line = self.line_mut(product_id)?;
        let quantity = (i64::from(line.quantity) + delta).clamp(1, i64::from(u32::MAX));
        line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        Ok(())
    }

    /// Days only apply to per-day products; flat-rate lines stay at one day.
    pub fn set_days(&mut self, product_id: i64, days: u32) -> Result<(), DraftError> {
        let line = self.line_mut(product_id)?;
        if line.pricing == PricingType::PerDay {
            line.days = days.max(1);
        }
        Ok(())
    }

    pub fn set_factor(&mut self, product_id: i64, factor: Decimal) -> Result<(), DraftError> {
        if factor <= Decimal::ZERO {
            return Err(DraftError::InvalidFactor(factor));
        }
        self.line_mut(product_id)?.factor = factor;
        Ok(())
    }

    pub fn set_unit_price(&mut self, product_id: i64, price: Decimal) -> Result<(), DraftError> {
        if price < Decimal::ZERO {
            return Err(DraftError::NegativePrice(price));
        }
        self.line_mut(product_id)?.unit_price = price;
        Ok(())
    }

    /// Immutable snapshot fed to the total calculator.
    pub fn line_items(&self) -> Vec<LineItem> {
        self.lines.iter().map(DraftLine::line_item).collect()
    }

    /// Backend lines with their totals. Fails when a line total overflows.
    pub fn payloads(&self) -> Result<Vec<LineItemPayload>, DraftError> {
        Ok(self
            .lines
            .iter()
            .map(DraftLine::payload)
            .collect::<Result<_, _>>()?)
    }

    /// Checks run before the draft is persisted.
    pub fn ensure_persistable(
        &self,
        name: &str,
        counterparty: Option<i64>,
    ) -> Result<(), DraftError> {
        if name.trim().is_empty() {
            return Err(DraftError::MissingName);
        }
        if counterparty.is_none() {
            return Err(DraftError::MissingCounterparty);
        }
        if self.lines.is_empty() {
            return Err(DraftError::Empty);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(id: i64, price: Decimal, pricing_type: &str) -> Product {
        Product {
            id,
            name: format!("Produit {}", id),
            description: None,
            category_id: 1,
            category_name: Some("Mobilier".to_string()),
            supplier_id: 3,
            supplier_name: Some("Expo Services".to_string()),
            unit: "pièce".to_string(),
            price,
            pricing_type: pricing_type.to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_adding_same_product_merges_quantity() {
        let chair = product(1, dec!(10), "Par Jour");
        let mut draft = DocumentDraft::new();
        draft.add_product(&chair);
        draft.add_product(&chair);
        assert_eq!(draft.lines().len(), 1);
        assert_eq!(draft.lines()[0].quantity, 2);
    }

    #[test]
    fn test_quantity_and_days_floor_at_one() {
        let chair = product(1, dec!(10), "Par Jour");
        let mut draft = DocumentDraft::new();
        draft.add_product(&chair);
        draft.set_quantity(1, 0).unwrap();
        draft.set_days(1, 0).unwrap();
        draft.adjust_quantity(1, -5).unwrap();
        assert_eq!(draft.lines()[0].quantity, 1);
        assert_eq!(draft.lines()[0].days, 1);
    }

    #[test]
    fn test_flat_products_ignore_days() {
        let booth = product(2, dec!(500), "Forfait");
        let mut draft = DocumentDraft::new();
        draft.add_product(&booth);
        draft.set_days(2, 4).unwrap();
        assert_eq!(draft.lines()[0].days, 1);
        assert_eq!(draft.line_items()[0].line_total(), Ok(dec!(500)));
    }

    #[test]
    fn test_factor_and_price_guards() {
        let chair = product(1, dec!(10), "Par Jour");
        let mut draft = DocumentDraft::new();
        draft.add_product(&chair);
        assert_eq!(
            draft.set_factor(1, Decimal::ZERO),
            Err(DraftError::InvalidFactor(Decimal::ZERO))
        );
        assert!(draft.set_unit_price(1, dec!(-1)).is_err());
        draft.set_factor(1, dec!(1.5)).unwrap();
        draft.set_unit_price(1, dec!(8)).unwrap();
        assert_eq!(draft.line_items()[0].line_total(), Ok(dec!(12)));
    }

    #[test]
    fn test_editing_missing_line_fails() {
        let mut draft = DocumentDraft::new();
        assert_eq!(draft.set_quantity(9, 2), Err(DraftError::NotInDraft(9)));
        assert!(!draft.remove_product(9));
    }

    #[test]
    fn test_build_prices_from_catalog() {
        let catalog = vec![product(1, dec!(10), "Par Jour"), product(2, dec!(500), "Forfait")];
        let inputs = vec![
            DraftLineInput {
                product_id: 1,
                quantity: 2,
                days: Some(3),
                factor: None,
                unit_price: None,
            },
            DraftLineInput {
                product_id: 1,
                quantity: 1,
                days: None,
                factor: None,
                unit_price: None,
            },
        ];
        let draft = DocumentDraft::build(&inputs, &catalog).unwrap();
        assert_eq!(draft.lines().len(), 1);
        assert_eq!(draft.lines()[0].quantity, 3);
        assert_eq!(draft.lines()[0].days, 3);
        assert_eq!(draft.payloads().unwrap()[0].total_price, dec!(90));
    }

    #[test]
    fn test_build_rejects_merged_quantity_overflow() {
        let catalog = vec![product(1, dec!(10), "Par Jour")];
        let line = DraftLineInput {
            product_id: 1,
            quantity: 3_000_000_000,
            days: None,
            factor: None,
            unit_price: None,
        };
        assert_eq!(
            DocumentDraft::build(&[line.clone(), line], &catalog),
            Err(DraftError::QuantityOverflow(1))
        );
    }

    #[test]
    fn test_add_product_saturates_quantity() {
        let chair = product(1, dec!(10), "Par Jour");
        let mut draft = DocumentDraft::new();
        draft.add_product(&chair);
        draft.set_quantity(1, u32::MAX).unwrap();
        draft.add_product(&chair);
        assert_eq!(draft.lines()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_payloads_reject_overflowing_total() {
        let catalog = vec![product(1, dec!(100000000000000000000), "Par Jour")];
        let inputs = vec![DraftLineInput {
            product_id: 1,
            quantity: 4_000_000_000,
            days: Some(4_000_000_000),
            factor: None,
            unit_price: None,
        }];
        let draft = DocumentDraft::build(&inputs, &catalog).unwrap();
        assert_eq!(draft.payloads(), Err(DraftError::Amount(AmountOverflow)));
    }

    #[test]
    fn test_build_rejects_unknown_product() {
        let inputs = vec![DraftLineInput {
            product_id: 42,
            quantity: 1,
            days: None,
            factor: None,
            unit_price: None,
        }];
        assert_eq!(
            DocumentDraft::build(&inputs, &[]),
            Err(DraftError::UnknownProduct(42))
        );
    }

    #[test]
    fn test_persistence_checks() {
        let mut draft = DocumentDraft::new();
        assert_eq!(
            draft.ensure_persistable(" ", Some(1)),
            Err(DraftError::MissingName)
        );
        assert_eq!(
            draft.ensure_persistable("Stand A", None),
            Err(DraftError::MissingCounterparty)
        );
        assert_eq!(
            draft.ensure_persistable("Stand A", Some(1)),
            Err(DraftError::Empty)
        );
        draft.add_product(&product(1, dec!(10), "Par Jour"));
        assert!(draft.ensure_persistable("Stand A", Some(1)).is_ok());
    }
}
