//! Dashboard aggregates over stands, purchase orders and invoices.

use super::backend_client::{BackendClient, CallContext, Collection};
use crate::models::{Invoice, InvoiceStatus, Purchase, Stand, StandStatus, remaining_balance};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use tracing::{instrument, warn};

const TOP_STANDS: usize = 5;
const TOP_PRODUCTS: usize = 10;
const TOP_SUPPLIERS: usize = 5;
const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreatorStats {
    pub creator: String,
    pub stands: usize,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StandSummary {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductUsage {
    pub product_name: String,
    pub category: String,
    /// Number of stand lines using the product.
    pub usage: usize,
    pub total_quantity: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NamedAmount {
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct InvoiceRevenue {
    pub invoiced: Decimal,
    pub paid: Decimal,
    pub outstanding: Decimal,
    pub quotes: usize,
    pub cancelled: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStatistics {
    pub stand_count: usize,
    pub approved_stands: usize,
    pub total_stand_amount: Decimal,
    pub average_stand_amount: Decimal,
    pub stands_by_status: BTreeMap<String, usize>,
    pub stands_by_creator: Vec<CreatorStats>,
    pub top_stands: Vec<StandSummary>,
    pub top_products: Vec<ProductUsage>,
    pub spend_by_supplier: Vec<NamedAmount>,
    pub spend_by_category: Vec<NamedAmount>,
    pub purchase_count: usize,
    pub purchases_by_status: BTreeMap<String, usize>,
    pub purchase_total: Decimal,
    pub invoices: InvoiceRevenue,
}

fn sorted_amounts(amounts: HashMap<String, Decimal>, limit: Option<usize>) -> Vec<NamedAmount> {
    let mut rows: Vec<NamedAmount> = amounts
        .into_iter()
        .map(|(name, amount)| NamedAmount { name, amount })
        .collect();
    rows.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}

/// Dashboard sums clamp at the decimal bounds instead of failing the whole page.
fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn invoice_revenue(invoices: &[Invoice]) -> InvoiceRevenue {
    let mut revenue = InvoiceRevenue::default();

    for invoice in invoices {
        let status = match invoice.invoice_status() {
            Ok(status) => status,
            Err(e) => {
                warn!(invoice_id = invoice.id, error = %e, "Skipping invoice with unknown status");
                continue;
            }
        };

        match status {
            InvoiceStatus::Quote => revenue.quotes += 1,
            InvoiceStatus::Cancelled => revenue.cancelled += 1,
            InvoiceStatus::Issued => {
                revenue.invoiced = revenue.invoiced.saturating_add(invoice.total_ttc);
                revenue.paid = revenue
                    .paid
                    .saturating_add(invoice.advance_payment.min(invoice.total_ttc));
                revenue.outstanding = revenue.outstanding.saturating_add(remaining_balance(
                    status,
                    invoice.total_ttc,
                    invoice.advance_payment,
                ));
            }
            InvoiceStatus::Paid => {
                revenue.invoiced = revenue.invoiced.saturating_add(invoice.total_ttc);
                revenue.paid = revenue.paid.saturating_add(invoice.total_ttc);
            }
        }
    }

    revenue
}

/// Pure aggregation over already fetched lists.
pub fn compute(stands: &[Stand], purchases: &[Purchase], invoices: &[Invoice]) -> DashboardStatistics {
    let stand_count = stands.len();
    let total_stand_amount = saturating_sum(stands.iter().map(|s| s.total_amount));
    let average_stand_amount = if stand_count > 0 {
        total_stand_amount / Decimal::from(stand_count)
    } else {
        Decimal::ZERO
    };

    let mut stands_by_status = BTreeMap::new();
    let mut creators: HashMap<String, CreatorStats> = HashMap::new();
    let mut usage: HashMap<String, ProductUsage> = HashMap::new();
    let mut suppliers: HashMap<String, Decimal> = HashMap::new();
    let mut categories: HashMap<String, Decimal> = HashMap::new();

    for stand in stands {
        *stands_by_status.entry(stand.status.clone()).or_insert(0) += 1;

        let creator = stand.creator.clone().unwrap_or_else(|| UNKNOWN.to_string());
        let entry = creators.entry(creator.clone()).or_insert(CreatorStats {
            creator,
            stands: 0,
            total: Decimal::ZERO,
        });
        entry.stands += 1;
        entry.total = entry.total.saturating_add(stand.total_amount);

        for item in &stand.items {
            let name = item.product_name.clone().unwrap_or_else(|| UNKNOWN.to_string());
            let product = usage.entry(name.clone()).or_insert(ProductUsage {
                product_name: name,
                category: item.category_name.clone().unwrap_or_else(|| "N/A".to_string()),
                usage: 0,
                total_quantity: 0,
            });
            product.usage += 1;
            product.total_quantity += u64::from(item.quantity);

            let supplier = item.supplier_name.clone().unwrap_or_else(|| UNKNOWN.to_string());
            let spend = suppliers.entry(supplier).or_insert(Decimal::ZERO);
            *spend = spend.saturating_add(item.total_price);

            let category = item.category_name.clone().unwrap_or_else(|| UNKNOWN.to_string());
            let spend = categories.entry(category).or_insert(Decimal::ZERO);
            *spend = spend.saturating_add(item.total_price);
        }
    }

    let mut stands_by_creator: Vec<CreatorStats> = creators.into_values().collect();
    stands_by_creator.sort_by(|a, b| b.stands.cmp(&a.stands).then_with(|| a.creator.cmp(&b.creator)));

    let mut top_stands: Vec<StandSummary> = stands
        .iter()
        .map(|s| StandSummary {
            id: s.id,
            name: s.name.clone(),
            status: s.status.clone(),
            total_amount: s.total_amount,
        })
        .collect();
    top_stands.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
    top_stands.truncate(TOP_STANDS);

    let mut top_products: Vec<ProductUsage> = usage.into_values().collect();
    top_products.sort_by(|a, b| {
        b.usage
            .cmp(&a.usage)
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    top_products.truncate(TOP_PRODUCTS);

    let mut purchases_by_status = BTreeMap::new();
    for purchase in purchases {
        *purchases_by_status.entry(purchase.status.clone()).or_insert(0) += 1;
    }

    DashboardStatistics {
        stand_count,
        approved_stands: stands
            .iter()
            .filter(|s| s.status == StandStatus::Approved.as_str())
            .count(),
        total_stand_amount,
        average_stand_amount,
        stands_by_status,
        stands_by_creator,
        top_stands,
        top_products,
        spend_by_supplier: sorted_amounts(suppliers, Some(TOP_SUPPLIERS)),
        spend_by_category: sorted_amounts(categories, None),
        purchase_count: purchases.len(),
        purchases_by_status,
        purchase_total: saturating_sum(purchases.iter().map(|p| p.total_amount)),
        invoices: invoice_revenue(invoices),
    }
}

/// A list that fails to load counts as empty so the rest of the dashboard still renders.
async fn list_or_empty<T: DeserializeOwned>(
    backend: &BackendClient,
    ctx: &CallContext,
    collection: Collection,
) -> Vec<T> {
    match backend.list(ctx, collection).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!(collection = collection.name(), error = %e, "Statistics source unavailable");
            Vec::new()
        }
    }
}

#[instrument(skip(backend, ctx))]
pub async fn dashboard(backend: &BackendClient, ctx: &CallContext) -> DashboardStatistics {
    let stands: Vec<Stand> = list_or_empty(backend, ctx, Collection::Stands).await;
    let purchases: Vec<Purchase> = list_or_empty(backend, ctx, Collection::Purchases).await;
    let invoices: Vec<Invoice> = list_or_empty(backend, ctx, Collection::Invoices).await;
    compute(&stands, &purchases, &invoices)
}
