//! Quote and invoice workflows.
//!
//! Every action reads the current invoice, checks the move against the
//! lifecycle table, sends a single write and applies the acknowledged change.
//! Nothing is sent when the check fails and nothing is applied when the write fails.

use super::backend_client::{BackendClient, CallContext, Collection};
use super::metrics::record_transition;
use super::pricing::{Discount, calculate_totals};
use super::stands::{find_stand, rejected};
use crate::config::PricingSettings;
use crate::models::{
    AdvancePaymentRequest, AmountOverflow, CreateInvoiceRequest, DocumentDraft, Invoice,
    InvoiceDetail, InvoiceItem, InvoiceItemsPayload, InvoicePayload, InvoiceStatus, InvoiceStatusPayload, InvoiceView,
    LineItem, LineItemPayload, PricedInvoice, Product, UpdateInvoiceItemsRequest, check_advance,
};
use anyhow::anyhow;
use rust_decimal::Decimal;
use stand_core::error::AppError;
use tracing::{info, instrument, warn};
use validator::Validate;

#[instrument(skip(backend, ctx))]
pub async fn list_invoices(
    backend: &BackendClient,
    ctx: &CallContext,
) -> Result<Vec<InvoiceView>, AppError> {
    let invoices: Vec<Invoice> = backend.list(ctx, Collection::Invoices).await?;

    Ok(invoices
        .into_iter()
        .filter_map(|invoice| {
            let id = invoice.id;
            InvoiceView::try_from(invoice)
                .map_err(|e| warn!(invoice_id = id, error = %e, "Skipping invoice with unknown status"))
                .ok()
        })
        .collect())
}

#[instrument(skip(backend, ctx))]
pub async fn get_invoice(
    backend: &BackendClient,
    ctx: &CallContext,
    invoice_id: i64,
) -> Result<InvoiceDetail, AppError> {
    let invoice: Invoice = backend.get(ctx, Collection::Invoices, invoice_id).await?;
    let items: Vec<InvoiceItem> = backend.items(ctx, Collection::Invoices, invoice_id).await?;
    Ok(InvoiceDetail {
        view: InvoiceView::try_from(invoice)?,
        items,
    })
}

fn stand_lines(
    stand_items: &[crate::models::StandItem],
) -> Result<Vec<LineItemPayload>, AmountOverflow> {
    stand_items
        .iter()
        .map(|item| {
            let line = LineItem::new(item.product_id, item.quantity, item.unit_price)
                .with_days(item.days.max(1));
            Ok(LineItemPayload {
                product_id: item.product_id,
                product_name: item.product_name.clone(),
                quantity: line.quantity,
                days: line.days,
                unit_price: line.unit_price,
                factor: line.factor,
                total_price: line.line_total()?,
                pricing_type: None,
            })
        })
        .collect()
}

fn payload_items(lines: &[LineItemPayload]) -> Vec<LineItem> {
    lines
        .iter()
        .map(|l| {
            LineItem::new(l.product_id, l.quantity, l.unit_price)
                .with_days(l.days)
                .with_factor(l.factor)
        })
        .collect()
}

/// Create a quote (devis), either from an approved stand or directly from lines.
#[instrument(skip(backend, ctx, pricing, request), fields(stand_id = ?request.stand_id))]
pub async fn create_invoice(
    backend: &BackendClient,
    ctx: &CallContext,
    pricing: &PricingSettings,
    request: CreateInvoiceRequest,
) -> Result<PricedInvoice, AppError> {
    const OPERATION: &str = "create_invoice";

    request.validate().map_err(|e| rejected(OPERATION, e))?;
    let discount = Discount::new(request.remise_type, request.remise.unwrap_or_default());
    discount.check().map_err(|e| rejected(OPERATION, e))?;
    if request.stand_id.is_none() && request.items.is_empty() {
        return Err(rejected(
            OPERATION,
            AppError::BadRequest(anyhow!("No products provided for invoice")),
        ));
    }

    let mut currency = request.currency.clone().filter(|c| !c.is_empty());
    let lines = if let Some(stand_id) = request.stand_id {
        let stand = find_stand(backend, ctx, stand_id).await?;
        if !stand.stand_status()?.is_invoiceable() {
            return Err(rejected(
                OPERATION,
                AppError::InvalidTransition(
                    "Stand must be approved before creating invoice".to_string(),
                ),
            ));
        }
        currency = currency.or(Some(stand.currency.clone()));
        if request.items.is_empty() {
            stand_lines(&stand.items).map_err(|e| rejected(OPERATION, e))?
        } else {
            let catalog: Vec<Product> = backend.list(ctx, Collection::Products).await?;
            DocumentDraft::build(&request.items, &catalog)
                .and_then(|draft| draft.payloads())
                .map_err(|e| rejected(OPERATION, e))?
        }
    } else {
        let catalog: Vec<Product> = backend.list(ctx, Collection::Products).await?;
        DocumentDraft::build(&request.items, &catalog)
            .and_then(|draft| draft.payloads())
            .map_err(|e| rejected(OPERATION, e))?
    };

    if lines.is_empty() {
        return Err(rejected(
            OPERATION,
            AppError::BadRequest(anyhow!("No products provided for invoice")),
        ));
    }

    let tax_rate = request.tva_percentage.unwrap_or(pricing.default_tax_rate);
    let stamp = request.timbre_fiscale.unwrap_or_default();
    let totals = calculate_totals(&payload_items(&lines), discount, tax_rate)
        .and_then(|totals| totals.with_fiscal_stamp(stamp))
        .map_err(|e| rejected(OPERATION, e))?;

    let payload = InvoicePayload {
        use_stand: request.stand_id.is_some(),
        stand_id: request.stand_id,
        client_id: request.client_id,
        client_name: request.client_name,
        client_email: request.client_email,
        client_phone: request.client_phone,
        client_address: request.client_address,
        client_company: request.client_company,
        remise: discount.value,
        remise_type: discount.kind,
        tva_percentage: tax_rate,
        timbre_fiscale: stamp,
        currency: currency.unwrap_or_else(|| pricing.default_currency.clone()),
        company_name: request.company_name,
        company_address: request.company_address,
        company_phone: request.company_phone,
        company_email: request.company_email,
        modified_items: lines,
    };

    let ack = backend.create(ctx, Collection::Invoices, &payload).await?;
    let id = ack
        .id("invoice_id")
        .ok_or_else(|| AppError::BadGateway("Backend did not return an invoice id".to_string()))?;
    let number = ack.text("invoice_number");

    info!(invoice_id = id, invoice_number = ?number, total = %totals.total, "Quote created");

    Ok(PricedInvoice::new(
        id,
        number,
        InvoiceStatus::Quote,
        totals,
        payload.modified_items,
    ))
}

/// Replace the lines of a quote. Issued, paid and cancelled invoices are frozen.
#[instrument(skip(backend, ctx, request))]
pub async fn update_items(
    backend: &BackendClient,
    ctx: &CallContext,
    invoice_id: i64,
    request: UpdateInvoiceItemsRequest,
) -> Result<PricedInvoice, AppError> {
    const OPERATION: &str = "update_invoice_items";

    request.validate().map_err(|e| rejected(OPERATION, e))?;

    let invoice: Invoice = backend.get(ctx, Collection::Invoices, invoice_id).await?;
    let status = invoice.invoice_status()?;
    if !status.is_editable() {
        return Err(rejected(
            OPERATION,
            AppError::InvalidTransition(format!(
                "Only quotes can be edited, invoice {} is '{}'",
                invoice.invoice_number,
                status.as_str()
            )),
        ));
    }

    let catalog: Vec<Product> = backend.list(ctx, Collection::Products).await?;
    let draft = DocumentDraft::build(&request.items, &catalog).map_err(|e| rejected(OPERATION, e))?;

    let totals = calculate_totals(&draft.line_items(), invoice.discount(), invoice.tva_percentage)
        .and_then(|totals| totals.with_fiscal_stamp(invoice.timbre_fiscale))
        .map_err(|e| rejected(OPERATION, e))?;
    let payload = InvoiceItemsPayload {
        modified_items: draft.payloads().map_err(|e| rejected(OPERATION, e))?,
    };
    backend
        .update(ctx, Collection::Invoices, invoice_id, &payload)
        .await?;

    info!(invoice_id, total = %totals.total, "Quote lines replaced");

    Ok(PricedInvoice::new(
        invoice_id,
        Some(invoice.invoice_number),
        status,
        totals,
        payload.modified_items,
    ))
}

/// Send one status change and apply it locally once acknowledged.
async fn move_invoice(
    backend: &BackendClient,
    ctx: &CallContext,
    mut invoice: Invoice,
    next: InvoiceStatus,
    advance_payment: Option<Decimal>,
) -> Result<InvoiceView, AppError> {
    let current = invoice.invoice_status()?;
    let payload = InvoiceStatusPayload {
        status: next,
        advance_payment,
    };
    let ack = backend
        .update_invoice_status(ctx, invoice.id, &payload)
        .await?;

    if let Some(number) = ack.text("invoice_number") {
        invoice.invoice_number = number;
    }
    if let Some(advance) = advance_payment {
        invoice.advance_payment = advance;
    }
    invoice.status = next.as_str().to_string();

    record_transition("invoice", current.as_str(), next.as_str());
    info!(
        invoice_id = invoice.id,
        invoice_number = %invoice.invoice_number,
        from = current.as_str(),
        to = next.as_str(),
        "Invoice status changed"
    );

    Ok(InvoiceView::try_from(invoice)?)
}

/// Sign a quote: devis -> facture, optionally recording an advance payment.
#[instrument(skip(backend, ctx, request))]
pub async fn sign(
    backend: &BackendClient,
    ctx: &CallContext,
    invoice_id: i64,
    request: AdvancePaymentRequest,
) -> Result<InvoiceView, AppError> {
    let invoice: Invoice = backend.get(ctx, Collection::Invoices, invoice_id).await?;
    let next = invoice
        .invoice_status()?
        .transition(InvoiceStatus::Issued)
        .map_err(|e| rejected("sign_invoice", e))?;

    let advance = request.advance_payment.unwrap_or_default();
    check_advance(advance, invoice.total_ttc).map_err(|e| rejected("sign_invoice", e))?;

    let mut signed = move_invoice(backend, ctx, invoice, next, Some(advance)).await?;
    if !signed.invoice.invoice_number.starts_with("FAC-") {
        signed.invoice.invoice_number = signed.invoice.invoice_number.replacen("DEV-", "FAC-", 1);
    }
    Ok(signed)
}

/// Settle an issued invoice. The recorded advance is kept unless a new one is given.
#[instrument(skip(backend, ctx, request))]
pub async fn pay(
    backend: &BackendClient,
    ctx: &CallContext,
    invoice_id: i64,
    request: AdvancePaymentRequest,
) -> Result<InvoiceView, AppError> {
    let invoice: Invoice = backend.get(ctx, Collection::Invoices, invoice_id).await?;
    let next = invoice
        .invoice_status()?
        .transition(InvoiceStatus::Paid)
        .map_err(|e| rejected("pay_invoice", e))?;

    let advance = request.advance_payment.unwrap_or(invoice.advance_payment);
    check_advance(advance, invoice.total_ttc).map_err(|e| rejected("pay_invoice", e))?;

    move_invoice(backend, ctx, invoice, next, Some(advance)).await
}

#[instrument(skip(backend, ctx))]
pub async fn cancel(
    backend: &BackendClient,
    ctx: &CallContext,
    invoice_id: i64,
) -> Result<InvoiceView, AppError> {
    let invoice: Invoice = backend.get(ctx, Collection::Invoices, invoice_id).await?;
    let next = invoice
        .invoice_status()?
        .transition(InvoiceStatus::Cancelled)
        .map_err(|e| rejected("cancel_invoice", e))?;

    move_invoice(backend, ctx, invoice, next, None).await
}
