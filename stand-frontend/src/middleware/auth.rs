use crate::models::{Module, Role, User};
use crate::services::backend_client::CallContext;
use crate::services::metrics::record_rejection;
use crate::AppState;
use anyhow::anyhow;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use stand_core::error::AppError;
use stand_core::observability::REQUEST_ID_HEADER;
use tracing::warn;

/// Bearer token of the inbound request, forwarded as-is to the backend.
#[async_trait]
impl<S> FromRequestParts<S> for CallContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::Unauthorized(anyhow!("Missing bearer token")))?;

        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(CallContext::new(token).with_request_id(request_id))
    }
}

/// Caller resolved through the backend's `/auth/me`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub ctx: CallContext,
}

impl AuthUser {
    /// Refuse the request unless the caller may open `module`.
    pub fn require(&self, module: Module) -> Result<(), AppError> {
        if self.user.can_access(module) {
            return Ok(());
        }
        warn!(
            user_id = self.user.id,
            role = %self.user.role,
            module = module.as_str(),
            "Access denied"
        );
        record_rejection(module.as_str(), "forbidden");
        Err(AppError::Forbidden(anyhow!(
            "Your role does not give access to {}",
            module.as_str()
        )))
    }

    /// Refuse the request unless the caller holds one of `roles`.
    pub fn require_role(&self, action: &str, roles: &[Role]) -> Result<(), AppError> {
        if self
            .user
            .business_role()
            .is_some_and(|role| roles.contains(&role))
        {
            return Ok(());
        }
        warn!(user_id = self.user.id, role = %self.user.role, action, "Access denied");
        record_rejection(action, "forbidden");
        Err(AppError::Forbidden(anyhow!("Your role cannot {}", action)))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = CallContext::from_request_parts(parts, state).await?;
        let user = state.backend.current_user(&ctx).await?;
        Ok(Self { user, ctx })
    }
}
