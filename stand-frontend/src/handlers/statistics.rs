use crate::middleware::AuthUser;
use crate::models::Module;
use crate::services::statistics::{self, DashboardStatistics};
use crate::AppState;
use axum::{extract::State, Json};
use stand_core::error::AppError;

pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DashboardStatistics>, AppError> {
    auth.require(Module::Statistics)?;
    Ok(Json(statistics::dashboard(&state.backend, &auth.ctx).await))
}
