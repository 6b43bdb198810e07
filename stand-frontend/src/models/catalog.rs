//! Catalog models: categories and rentable products.

use super::line_item::PricingType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub product_count: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Input for creating or updating a category.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 4, max = 20))]
    pub color: Option<String>,
}

/// Rentable product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category_id: i64,
    #[serde(default)]
    pub category_name: Option<String>,
    pub supplier_id: i64,
    #[serde(default)]
    pub supplier_name: Option<String>,
    pub unit: String,
    pub price: Decimal,
    pub pricing_type: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Product {
    pub fn pricing(&self) -> PricingType {
        PricingType::from_string(&self.pricing_type)
    }
}

/// Input for creating or updating a product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category_id: i64,
    pub supplier_id: i64,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    #[validate(custom(function = "crate::models::non_negative"))]
    pub price: Decimal,
    #[validate(custom(function = "known_pricing_type"))]
    pub pricing_type: String,
}

fn known_pricing_type(value: &str) -> Result<(), ValidationError> {
    match value {
        "Par Jour" | "Forfait" | "Par Événement" => Ok(()),
        _ => Err(ValidationError::new("unknown_pricing_type")),
    }
}

/// Sort order for catalog listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSort {
    #[default]
    Name,
    PriceAsc,
    PriceDesc,
    Category,
}

/// Catalog filters as sent by the stand simulator's search panel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub pricing_type: Option<String>,
    #[serde(default)]
    pub min_price: Option<Decimal>,
    #[serde(default)]
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub sort: ProductSort,
    /// Return products grouped by category.
    #[serde(default)]
    pub group: bool,
}

/// Products of one category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub products: Vec<Product>,
}
