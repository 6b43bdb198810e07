use crate::services::pricing::{Discount, PricingPreview, PricingPreviewRequest, calculate_totals};
use crate::services::stands::rejected;
use crate::AppState;
use axum::{extract::State, Json};
use stand_core::error::AppError;
use validator::Validate;

/// Price a set of lines without touching the backend.
pub async fn preview(
    State(state): State<AppState>,
    Json(request): Json<PricingPreviewRequest>,
) -> Result<Json<PricingPreview>, AppError> {
    request.validate().map_err(|e| rejected("pricing_preview", e))?;
    let discount = Discount::new(request.discount_type, request.discount);
    discount.check().map_err(|e| rejected("pricing_preview", e))?;

    let items: Vec<_> = request.items.iter().map(|line| line.line_item()).collect();
    let tax_rate = request.tax_rate.unwrap_or(state.pricing.default_tax_rate);
    let exact = calculate_totals(&items, discount, tax_rate)
        .and_then(|totals| totals.with_fiscal_stamp(request.fiscal_stamp.unwrap_or_default()))
        .map_err(|e| rejected("pricing_preview", e))?;

    Ok(Json(PricingPreview {
        rounded: exact.rounded(),
        exact,
    }))
}
