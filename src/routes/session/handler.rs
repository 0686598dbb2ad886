use axum::{
    Extension,
    extract::State,
    response::IntoResponse,
};
use serde::Serialize;

use crate::{AppState, error::AppError, middleware::AuthContext, utils::success_to_api_response};

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub subject: String,
    pub role: u32,
    pub expires_at: i64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub cache: &'static str,
}

#[axum::debug_handler]
pub async fn whoami(Extension(ctx): Extension<AuthContext>) -> impl IntoResponse {
    success_to_api_response(WhoAmIResponse {
        subject: ctx.access.subject,
        role: ctx.access.role,
        expires_at: ctx.access.expires_at,
    })
}

/// 只允许角色级别不低于配置值的令牌访问
#[axum::debug_handler]
pub async fn elevated(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.access.has_elevation(state.config.elevated_role) {
        return Err(AppError::PermissionDenied);
    }
    Ok(success_to_api_response(WhoAmIResponse {
        subject: ctx.access.subject,
        role: ctx.access.role,
        expires_at: ctx.access.expires_at,
    }))
}

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.tokens.ping().await?;
    Ok(success_to_api_response(HealthResponse { cache: "ok" }))
}
