use crate::middleware::AuthUser;
use crate::models::{Category, CategoryGroup, CategoryInput, Module, Product, ProductInput, ProductQuery};
use crate::services::backend_client::{BackendAck, CallContext, Collection};
use crate::services::catalog;
use crate::services::stands::rejected;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use stand_core::error::AppError;
use validator::Validate;

pub async fn list_categories(
    State(state): State<AppState>,
    ctx: CallContext,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.backend.list(&ctx, Collection::Categories).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<BackendAck>), AppError> {
    auth.require(Module::Categories)?;
    input.validate().map_err(|e| rejected("create_category", e))?;
    let ack = state
        .backend
        .create(&auth.ctx, Collection::Categories, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(ack)))
}

pub async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(category_id): Path<i64>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<BackendAck>, AppError> {
    auth.require(Module::Categories)?;
    input.validate().map_err(|e| rejected("update_category", e))?;
    Ok(Json(
        state
            .backend
            .update(&auth.ctx, Collection::Categories, category_id, &input)
            .await?,
    ))
}

pub async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(category_id): Path<i64>,
) -> Result<Json<BackendAck>, AppError> {
    auth.require(Module::Categories)?;
    Ok(Json(
        state
            .backend
            .delete(&auth.ctx, Collection::Categories, category_id)
            .await?,
    ))
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProductListing {
    Flat(Vec<Product>),
    Grouped(Vec<CategoryGroup>),
}

/// Catalog listing with search, filters, sorting and optional grouping by category.
pub async fn list_products(
    State(state): State<AppState>,
    ctx: CallContext,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ProductListing>, AppError> {
    let products: Vec<Product> = state.backend.list(&ctx, Collection::Products).await?;
    let found = catalog::search(products, &query);

    Ok(Json(if query.group {
        ProductListing::Grouped(catalog::group_by_category(found))
    } else {
        ProductListing::Flat(found)
    }))
}

pub async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<BackendAck>), AppError> {
    auth.require(Module::Products)?;
    input.validate().map_err(|e| rejected("create_product", e))?;
    let ack = state
        .backend
        .create(&auth.ctx, Collection::Products, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(ack)))
}

pub async fn update_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(product_id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> Result<Json<BackendAck>, AppError> {
    auth.require(Module::Products)?;
    input.validate().map_err(|e| rejected("update_product", e))?;
    Ok(Json(
        state
            .backend
            .update(&auth.ctx, Collection::Products, product_id, &input)
            .await?,
    ))
}

pub async fn delete_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(product_id): Path<i64>,
) -> Result<Json<BackendAck>, AppError> {
    auth.require(Module::Products)?;
    Ok(Json(
        state
            .backend
            .delete(&auth.ctx, Collection::Products, product_id)
            .await?,
    ))
}
