use crate::middleware::AuthUser;
use crate::models::{navigation, NavigationItem, Role};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct NavigationResponse {
    pub user_id: i64,
    pub display_name: String,
    pub role: Option<Role>,
    pub items: Vec<NavigationItem>,
}

/// Sidebar entries for the calling user.
pub async fn navigation_menu(auth: AuthUser) -> Json<NavigationResponse> {
    Json(NavigationResponse {
        user_id: auth.user.id,
        display_name: auth.user.display_name().to_string(),
        role: auth.user.business_role(),
        items: navigation(&auth.user),
    })
}
