use super::pdf::attachment;
use crate::middleware::AuthUser;
use crate::models::{
    CreatePurchaseRequest, CreatedPurchase, Module, Purchase, PurchaseStatusChange,
    PurchaseStatusRequest,
};
use crate::services::backend_client::{CallContext, Collection};
use crate::services::purchasing;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use stand_core::error::AppError;

pub async fn list_purchases(
    State(state): State<AppState>,
    ctx: CallContext,
) -> Result<Json<Vec<Purchase>>, AppError> {
    Ok(Json(state.backend.list(&ctx, Collection::Purchases).await?))
}

pub async fn create_purchase(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreatePurchaseRequest>,
) -> Result<(StatusCode, Json<CreatedPurchase>), AppError> {
    auth.require(Module::Achat)?;
    let purchase = purchasing::create_purchase(&state.backend, &auth.ctx, request).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

pub async fn change_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(purchase_id): Path<i64>,
    Json(request): Json<PurchaseStatusRequest>,
) -> Result<Json<PurchaseStatusChange>, AppError> {
    auth.require(Module::Achat)?;
    Ok(Json(
        purchasing::change_status(&state.backend, &auth.ctx, purchase_id, request.status).await?,
    ))
}

pub async fn download_pdf(
    State(state): State<AppState>,
    ctx: CallContext,
    Path(purchase_id): Path<i64>,
) -> Result<Response, AppError> {
    let bytes = state
        .backend
        .download_pdf(&ctx, Collection::Purchases, purchase_id)
        .await?;
    Ok(attachment(format!("bon_commande_{}.pdf", purchase_id), bytes))
}
