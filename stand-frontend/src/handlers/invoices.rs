use super::pdf::attachment;
use crate::middleware::AuthUser;
use crate::models::{
    AdvancePaymentRequest, CreateInvoiceRequest, InvoiceDetail, InvoiceView, Module,
    PricedInvoice, UpdateInvoiceItemsRequest,
};
use crate::services::backend_client::{CallContext, Collection};
use crate::services::invoicing;
use crate::services::stands::rejected;
use crate::AppState;
use anyhow::anyhow;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use stand_core::error::AppError;

/// An empty body records no advance. Any other body must parse, or nothing is sent.
fn advance_request(operation: &str, body: &Bytes) -> Result<AdvancePaymentRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AdvancePaymentRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        rejected(
            operation,
            AppError::BadRequest(anyhow!("Invalid advance payment: {}", e)),
        )
    })
}

pub async fn list_invoices(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<InvoiceView>>, AppError> {
    auth.require(Module::Invoices)?;
    Ok(Json(invoicing::list_invoices(&state.backend, &auth.ctx).await?))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(invoice_id): Path<i64>,
) -> Result<Json<InvoiceDetail>, AppError> {
    auth.require(Module::Invoices)?;
    Ok(Json(
        invoicing::get_invoice(&state.backend, &auth.ctx, invoice_id).await?,
    ))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<PricedInvoice>), AppError> {
    auth.require(Module::Invoices)?;
    let invoice =
        invoicing::create_invoice(&state.backend, &auth.ctx, &state.pricing, request).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

pub async fn update_items(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(invoice_id): Path<i64>,
    Json(request): Json<UpdateInvoiceItemsRequest>,
) -> Result<Json<PricedInvoice>, AppError> {
    auth.require(Module::Invoices)?;
    Ok(Json(
        invoicing::update_items(&state.backend, &auth.ctx, invoice_id, request).await?,
    ))
}

/// devis -> facture
pub async fn sign_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(invoice_id): Path<i64>,
    body: Bytes,
) -> Result<Json<InvoiceView>, AppError> {
    auth.require(Module::Invoices)?;
    let request = advance_request("sign_invoice", &body)?;
    Ok(Json(
        invoicing::sign(&state.backend, &auth.ctx, invoice_id, request).await?,
    ))
}

pub async fn pay_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(invoice_id): Path<i64>,
    body: Bytes,
) -> Result<Json<InvoiceView>, AppError> {
    auth.require(Module::Invoices)?;
    let request = advance_request("pay_invoice", &body)?;
    Ok(Json(
        invoicing::pay(&state.backend, &auth.ctx, invoice_id, request).await?,
    ))
}

pub async fn cancel_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(invoice_id): Path<i64>,
) -> Result<Json<InvoiceView>, AppError> {
    auth.require(Module::Invoices)?;
    Ok(Json(
        invoicing::cancel(&state.backend, &auth.ctx, invoice_id).await?,
    ))
}

pub async fn download_pdf(
    State(state): State<AppState>,
    ctx: CallContext,
    Path(invoice_id): Path<i64>,
) -> Result<Response, AppError> {
    let bytes = state
        .backend
        .download_pdf(&ctx, Collection::Invoices, invoice_id)
        .await?;
    Ok(attachment(format!("facture_client_{}.pdf", invoice_id), bytes))
}
