//! Purchase order workflows.

use super::backend_client::{BackendClient, CallContext, Collection};
use super::metrics::record_transition;
use super::stands::{rejected, subtotal};
use crate::models::{
    CreatePurchaseRequest, CreatedPurchase, DocumentDraft, DraftError, Product, Purchase,
    PurchasePayload, PurchaseStatus, PurchaseStatusChange, PurchaseStatusPayload,
};
use anyhow::anyhow;
use stand_core::error::AppError;
use tracing::{info, instrument};
use validator::Validate;

async fn find_purchase(
    backend: &BackendClient,
    ctx: &CallContext,
    purchase_id: i64,
) -> Result<Purchase, AppError> {
    let purchases: Vec<Purchase> = backend.list(ctx, Collection::Purchases).await?;
    purchases
        .into_iter()
        .find(|p| p.id == purchase_id)
        .ok_or_else(|| AppError::NotFound(anyhow!("Purchase order {} not found", purchase_id)))
}

#[instrument(skip(backend, ctx, request), fields(supplier_id = ?request.supplier_id))]
pub async fn create_purchase(
    backend: &BackendClient,
    ctx: &CallContext,
    request: CreatePurchaseRequest,
) -> Result<CreatedPurchase, AppError> {
    const OPERATION: &str = "create_purchase";

    request.validate().map_err(|e| rejected(OPERATION, e))?;
    let supplier_id = request
        .supplier_id
        .ok_or_else(|| rejected(OPERATION, DraftError::MissingCounterparty))?;

    let catalog: Vec<Product> = backend.list(ctx, Collection::Products).await?;
    let draft = DocumentDraft::build(&request.items, &catalog).map_err(|e| rejected(OPERATION, e))?;
    if draft.is_empty() {
        return Err(rejected(OPERATION, DraftError::Empty));
    }

    let total_amount = subtotal(&draft).map_err(|e| rejected(OPERATION, e))?;
    let payload = PurchasePayload {
        supplier_id,
        stand_id: request.stand_id,
        total_amount,
        notes: request.notes.filter(|n| !n.trim().is_empty()),
        items: draft.payloads().map_err(|e| rejected(OPERATION, e))?,
    };

    let ack = backend.create(ctx, Collection::Purchases, &payload).await?;
    let id = ack.id("purchase_id").ok_or_else(|| {
        AppError::BadGateway("Backend did not return a purchase order id".to_string())
    })?;

    info!(purchase_id = id, total_amount = %total_amount, "Purchase order created");

    Ok(CreatedPurchase {
        id,
        purchase_number: ack.text("purchase_number"),
        status: PurchaseStatus::Pending,
        total_amount,
        items: payload.items,
    })
}

/// Move a purchase order one step forward.
#[instrument(skip(backend, ctx), fields(target = target.as_str()))]
pub async fn change_status(
    backend: &BackendClient,
    ctx: &CallContext,
    purchase_id: i64,
    target: PurchaseStatus,
) -> Result<PurchaseStatusChange, AppError> {
    let purchase = find_purchase(backend, ctx, purchase_id).await?;
    let current = purchase.purchase_status()?;
    let next = current
        .transition(target)
        .map_err(|e| rejected("purchase_status", e))?;

    backend
        .update_purchase_status(ctx, purchase_id, &PurchaseStatusPayload { status: next })
        .await?;

    record_transition("purchase", current.as_str(), next.as_str());
    info!(purchase_id, from = current.as_str(), to = next.as_str(), "Purchase order status changed");

    Ok(PurchaseStatusChange {
        id: purchase_id,
        previous_status: current,
        status: next,
        label: next.label(),
    })
}
