use crate::middleware::AuthUser;
use crate::models::{
    CreateStandRequest, CreatedStand, Module, Role, Stand, StandValidation,
    StandValidationOutcome, UpdateStandItemsRequest,
};
use crate::services::backend_client::{CallContext, Collection};
use crate::services::stands;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use stand_core::error::AppError;

pub async fn list_stands(
    State(state): State<AppState>,
    ctx: CallContext,
) -> Result<Json<Vec<Stand>>, AppError> {
    Ok(Json(state.backend.list(&ctx, Collection::Stands).await?))
}

/// Save the stand simulator's cart.
pub async fn create_stand(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateStandRequest>,
) -> Result<(StatusCode, Json<CreatedStand>), AppError> {
    auth.require(Module::StandSimulator)?;
    let stand = stands::create_stand(&state.backend, &auth.ctx, &state.pricing, request).await?;
    Ok((StatusCode::CREATED, Json(stand)))
}

pub async fn replace_items(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(stand_id): Path<i64>,
    Json(request): Json<UpdateStandItemsRequest>,
) -> Result<Json<CreatedStand>, AppError> {
    auth.require(Module::StandSimulator)?;
    Ok(Json(
        stands::replace_items(&state.backend, &auth.ctx, stand_id, request).await?,
    ))
}

pub async fn validate_logistics(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(stand_id): Path<i64>,
) -> Result<Json<StandValidationOutcome>, AppError> {
    auth.require_role("validate stand logistics", &[Role::Owner, Role::Logistics])?;
    Ok(Json(
        stands::record_validation(&state.backend, &auth.ctx, stand_id, StandValidation::Logistics)
            .await?,
    ))
}

pub async fn validate_finance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(stand_id): Path<i64>,
) -> Result<Json<StandValidationOutcome>, AppError> {
    auth.require_role("validate stand finances", &[Role::Owner, Role::Finance])?;
    Ok(Json(
        stands::record_validation(&state.backend, &auth.ctx, stand_id, StandValidation::Finance)
            .await?,
    ))
}
