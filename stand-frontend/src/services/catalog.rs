//! Catalog search for the stand simulator.

use crate::models::{CategoryGroup, Product, ProductQuery, ProductSort};
use std::collections::BTreeMap;

pub const UNCATEGORIZED: &str = "Sans catégorie";

fn matches(product: &Product, query: &ProductQuery, needle: Option<&str>) -> bool {
    if let Some(needle) = needle {
        let in_name = product.name.to_lowercase().contains(needle);
        let in_description = product
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle));
        if !in_name && !in_description {
            return false;
        }
    }
    if query.category_id.is_some_and(|id| id != product.category_id) {
        return false;
    }
    if query
        .pricing_type
        .as_deref()
        .is_some_and(|pricing| pricing != product.pricing_type)
    {
        return false;
    }
    if query.min_price.is_some_and(|min| product.price < min) {
        return false;
    }
    if query.max_price.is_some_and(|max| product.price > max) {
        return false;
    }
    true
}

fn category_of(product: &Product) -> &str {
    product
        .category_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(UNCATEGORIZED)
}

/// Filter and order products.
pub fn search(products: Vec<Product>, query: &ProductQuery) -> Vec<Product> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut found: Vec<Product> = products
        .into_iter()
        .filter(|p| matches(p, query, needle.as_deref()))
        .collect();

    match query.sort {
        ProductSort::Name => found.sort_by_key(|p| p.name.to_lowercase()),
        ProductSort::PriceAsc => found.sort_by(|a, b| a.price.cmp(&b.price)),
        ProductSort::PriceDesc => found.sort_by(|a, b| b.price.cmp(&a.price)),
        ProductSort::Category => found.sort_by(|a, b| {
            category_of(a)
                .cmp(category_of(b))
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }),
    }

    found
}

/// Group products by category name, keeping their order within each group.
pub fn group_by_category(products: Vec<Product>) -> Vec<CategoryGroup> {
    let mut groups: BTreeMap<String, Vec<Product>> = BTreeMap::new();
    for product in products {
        groups
            .entry(category_of(&product).to_string())
            .or_default()
            .push(product);
    }
    groups
        .into_iter()
        .map(|(category, products)| CategoryGroup { category, products })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn product(id: i64, name: &str, category: Option<&str>, price: Decimal, pricing: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: Some(format!("{} pour stand", name)),
            category_id: if category.is_some() { 1 } else { 0 },
            category_name: category.map(str::to_string),
            supplier_id: 1,
            supplier_name: None,
            unit: "pièce".to_string(),
            price,
            pricing_type: pricing.to_string(),
            created_at: None,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Table haute", Some("Mobilier"), dec!(25), "Par Jour"),
            product(2, "Spot LED", Some("Éclairage"), dec!(15), "Par Jour"),
            product(3, "Moquette", None, dec!(120), "Forfait"),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let query = ProductQuery {
            search: Some("LED".to_string()),
            ..Default::default()
        };
        let found = search(catalog(), &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 2);
    }

    #[test]
    fn test_search_matches_description() {
        let query = ProductQuery {
            search: Some("pour stand".to_string()),
            ..Default::default()
        };
        assert_eq!(search(catalog(), &query).len(), 3);
    }

    #[test]
    fn test_price_and_pricing_filters() {
        let query = ProductQuery {
            pricing_type: Some("Par Jour".to_string()),
            min_price: Some(dec!(20)),
            ..Default::default()
        };
        let found = search(catalog(), &query);
        assert_eq!(found.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_sort_by_price_desc() {
        let query = ProductQuery {
            sort: ProductSort::PriceDesc,
            ..Default::default()
        };
        let ids: Vec<_> = search(catalog(), &query).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_group_uses_fallback_category() {
        let groups = group_by_category(catalog());
        let names: Vec<_> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(names, vec!["Mobilier", "Sans catégorie", "Éclairage"]);
    }
}
