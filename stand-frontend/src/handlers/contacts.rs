use crate::middleware::AuthUser;
use crate::models::{Contact, ContactFilter, ContactInput, Module};
use crate::services::backend_client::{BackendAck, CallContext, Collection};
use crate::services::stands::rejected;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use stand_core::error::AppError;
use tracing::info;
use validator::Validate;

pub async fn list_contacts(
    State(state): State<AppState>,
    ctx: CallContext,
    Query(filter): Query<ContactFilter>,
) -> Result<Json<Vec<Contact>>, AppError> {
    let contacts = state.backend.list_contacts(&ctx, &filter).await?;
    Ok(Json(contacts))
}

pub async fn list_enterprises(
    State(state): State<AppState>,
    ctx: CallContext,
) -> Result<Json<Vec<Contact>>, AppError> {
    Ok(Json(state.backend.list_enterprises(&ctx).await?))
}

pub async fn list_employees(
    State(state): State<AppState>,
    ctx: CallContext,
    Path(enterprise_id): Path<i64>,
) -> Result<Json<Vec<Contact>>, AppError> {
    Ok(Json(
        state.backend.enterprise_employees(&ctx, enterprise_id).await?,
    ))
}

pub async fn create_contact(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ContactInput>,
) -> Result<(StatusCode, Json<BackendAck>), AppError> {
    auth.require(Module::Suppliers)?;
    input.validate().map_err(|e| rejected("create_contact", e))?;

    let ack = state
        .backend
        .create(&auth.ctx, Collection::Contacts, &input)
        .await?;
    info!(contact_id = ?ack.id("id"), contact_type = input.contact_type.as_str(), "Contact created");
    Ok((StatusCode::CREATED, Json(ack)))
}

pub async fn update_contact(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(contact_id): Path<i64>,
    Json(input): Json<ContactInput>,
) -> Result<Json<BackendAck>, AppError> {
    auth.require(Module::Suppliers)?;
    input.validate().map_err(|e| rejected("update_contact", e))?;

    let ack = state
        .backend
        .update(&auth.ctx, Collection::Contacts, contact_id, &input)
        .await?;
    Ok(Json(ack))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(contact_id): Path<i64>,
) -> Result<Json<BackendAck>, AppError> {
    auth.require(Module::Suppliers)?;
    let ack = state
        .backend
        .delete(&auth.ctx, Collection::Contacts, contact_id)
        .await?;
    info!(contact_id, "Contact deleted");
    Ok(Json(ack))
}
