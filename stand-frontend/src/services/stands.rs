//! Stand workflows: simulator save, item edits, logistics and finance sign-offs.

use super::backend_client::{BackendClient, CallContext, Collection};
use super::metrics::{record_rejection, record_transition};
use super::pricing::{Discount, calculate_totals};
use crate::config::PricingSettings;
use crate::models::{
    AmountOverflow, CreateStandRequest, CreatedStand, DocumentDraft, DraftError, Product, Stand,
    StandItemsPayload, StandPayload, StandValidation, StandValidationOutcome,
    UpdateStandItemsRequest,
};
use anyhow::anyhow;
use rust_decimal::Decimal;
use stand_core::error::AppError;
use tracing::{info, instrument, warn};
use validator::Validate;

/// Record a local refusal and hand the error back.
pub(crate) fn rejected(operation: &str, err: impl Into<AppError>) -> AppError {
    let err = err.into();
    record_rejection(operation, err.kind());
    err
}

pub(crate) async fn find_stand(
    backend: &BackendClient,
    ctx: &CallContext,
    stand_id: i64,
) -> Result<Stand, AppError> {
    let stands: Vec<Stand> = backend.list(ctx, Collection::Stands).await?;
    stands
        .into_iter()
        .find(|s| s.id == stand_id)
        .ok_or_else(|| AppError::NotFound(anyhow!("Stand {} not found", stand_id)))
}

/// Untaxed sum of the draft lines. Used as the stored stand amount.
pub(crate) fn subtotal(draft: &DocumentDraft) -> Result<Decimal, AmountOverflow> {
    Ok(calculate_totals(&draft.line_items(), Discount::none(), Decimal::ZERO)?.subtotal)
}

#[instrument(skip(backend, ctx, pricing, request), fields(name = %request.name))]
pub async fn create_stand(
    backend: &BackendClient,
    ctx: &CallContext,
    pricing: &PricingSettings,
    request: CreateStandRequest,
) -> Result<CreatedStand, AppError> {
    const OPERATION: &str = "create_stand";

    request.validate().map_err(|e| rejected(OPERATION, e))?;
    if request.name.trim().is_empty() {
        return Err(rejected(OPERATION, DraftError::MissingName));
    }
    let client_id = request
        .client_id
        .ok_or_else(|| rejected(OPERATION, DraftError::MissingCounterparty))?;

    let catalog: Vec<Product> = backend.list(ctx, Collection::Products).await?;
    let draft = DocumentDraft::build(&request.items, &catalog).map_err(|e| rejected(OPERATION, e))?;
    draft
        .ensure_persistable(&request.name, Some(client_id))
        .map_err(|e| rejected(OPERATION, e))?;

    let total_amount = subtotal(&draft).map_err(|e| rejected(OPERATION, e))?;
    let currency = request
        .currency
        .clone()
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| pricing.default_currency.clone());

    let payload = StandPayload {
        name: request.name.trim().to_string(),
        client_id,
        description: format!("Stand avec {} produit(s)", draft.lines().len()),
        total_amount,
        currency: currency.clone(),
        items: draft.payloads().map_err(|e| rejected(OPERATION, e))?,
    };

    let ack = backend.create(ctx, Collection::Stands, &payload).await?;
    let id = ack
        .id("stand_id")
        .ok_or_else(|| AppError::BadGateway("Backend did not return a stand id".to_string()))?;

    info!(stand_id = id, total_amount = %total_amount, "Stand saved");

    Ok(CreatedStand {
        id,
        name: payload.name,
        total_amount,
        currency,
        purchases_created: ack.id("purchases_created"),
        items: payload.items,
    })
}

#[instrument(skip(backend, ctx, request))]
pub async fn replace_items(
    backend: &BackendClient,
    ctx: &CallContext,
    stand_id: i64,
    request: UpdateStandItemsRequest,
) -> Result<CreatedStand, AppError> {
    const OPERATION: &str = "replace_stand_items";

    request.validate().map_err(|e| rejected(OPERATION, e))?;

    let stand = find_stand(backend, ctx, stand_id).await?;
    let catalog: Vec<Product> = backend.list(ctx, Collection::Products).await?;
    let draft = DocumentDraft::build(&request.items, &catalog).map_err(|e| rejected(OPERATION, e))?;
    if draft.is_empty() {
        return Err(rejected(OPERATION, DraftError::Empty));
    }

    let total_amount = subtotal(&draft).map_err(|e| rejected(OPERATION, e))?;
    let payload = StandItemsPayload {
        items: draft.payloads().map_err(|e| rejected(OPERATION, e))?,
    };
    backend.replace_stand_items(ctx, stand_id, &payload).await?;

    info!(stand_id, total_amount = %total_amount, "Stand items replaced");

    Ok(CreatedStand {
        id: stand.id,
        name: stand.name,
        total_amount,
        currency: stand.currency,
        purchases_created: None,
        items: payload.items,
    })
}

/// Record one department's sign-off.
///
/// The move is checked against the current state first. After the backend
/// acknowledges, the stand is read back and the stored status is returned.
#[instrument(skip(backend, ctx), fields(validation = validation.as_str()))]
pub async fn record_validation(
    backend: &BackendClient,
    ctx: &CallContext,
    stand_id: i64,
    validation: StandValidation,
) -> Result<StandValidationOutcome, AppError> {
    let operation = match validation {
        StandValidation::Logistics => "validate_logistics",
        StandValidation::Finance => "validate_finance",
    };

    let stand = find_stand(backend, ctx, stand_id).await?;
    let current = stand.stand_status()?;
    let expected = current
        .validate(validation)
        .map_err(|e| rejected(operation, e))?;

    backend.validate_stand(ctx, stand_id, validation).await?;

    let confirmed = find_stand(backend, ctx, stand_id).await?;
    let status = confirmed.stand_status()?;
    if status != expected {
        warn!(
            stand_id,
            expected = expected.as_str(),
            actual = status.as_str(),
            "Backend stored a different stand status"
        );
    }

    record_transition("stand", current.as_str(), status.as_str());
    info!(stand_id, from = current.as_str(), to = status.as_str(), "Stand validated");

    Ok(StandValidationOutcome {
        id: stand_id,
        previous_status: current.as_str().to_string(),
        status: status.as_str().to_string(),
        label: status.label(),
        invoiceable: status.is_invoiceable(),
    })
}
