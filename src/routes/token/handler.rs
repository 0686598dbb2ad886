use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use serde::Serialize;

use crate::{
    AppState,
    cache::models::{SessionState, SessionTtl, SignedTokenPair, TokenKind, TokenPair, TokenStatus},
    error::AppError,
    result::ApiResult,
    utils::success_to_api_response,
};

use super::model::{IssueRequest, RenewRequest, RevokeRequest, StatusRequest};

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub state: SessionState,
    #[serde(flatten)]
    pub flags: TokenStatus,
}

#[derive(Debug, Serialize)]
pub struct RevokeResponse {}

fn session_ttl(state: &AppState) -> Result<SessionTtl, AppError> {
    state.config.session_ttl().map_err(|e| {
        tracing::error!("Invalid token lifetime configuration: {}", e);
        AppError::InternalServerError
    })
}

fn sign(state: &AppState, pair: &TokenPair) -> Result<Json<ApiResult<SignedTokenPair>>, AppError> {
    let signed = pair.sign(&state.codec).map_err(|e| {
        tracing::error!("Failed to sign token pair: {}", e);
        AppError::InternalServerError
    })?;
    Ok(success_to_api_response(signed))
}

/// 签发令牌对，调用方负责事先验证主体身份
#[axum::debug_handler]
pub async fn issue(
    State(state): State<AppState>,
    Json(req): Json<IssueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let subject = req.subject.trim();
    if subject.is_empty() {
        return Err(AppError::InvalidRequest("主体不能为空".to_string()));
    }

    let pair = state
        .tokens
        .issue(subject, req.role, &session_ttl(&state)?)
        .await?;
    sign(&state, &pair)
}

#[axum::debug_handler]
pub async fn renew(
    State(state): State<AppState>,
    Json(req): Json<RenewRequest>,
) -> Result<impl IntoResponse, AppError> {
    // 续期令牌自身过期即视为登录过期
    let renewal = state
        .codec
        .decode(&req.renewal_token, TokenKind::Renewal)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::LoginExpired,
            _ => AppError::Unauthorized,
        })?;

    let pair = state
        .tokens
        .renew(&renewal, &session_ttl(&state)?)
        .await?
        .ok_or(AppError::LoginExpired)?;
    sign(&state, &pair)
}

#[axum::debug_handler]
pub async fn revoke(
    State(state): State<AppState>,
    Json(req): Json<RevokeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let access = state
        .codec
        .decode_lenient(&req.access_token, TokenKind::Access)
        .map_err(|_| AppError::Unauthorized)?;
    let renewal = state
        .codec
        .decode_lenient(&req.renewal_token, TokenKind::Renewal)
        .map_err(|_| AppError::Unauthorized)?;

    state
        .tokens
        .revoke(&access.unique_id, &renewal.unique_id)
        .await;
    Ok(success_to_api_response(RevokeResponse {}))
}

#[axum::debug_handler]
pub async fn status(
    State(state): State<AppState>,
    Json(req): Json<StatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let access = state
        .codec
        .decode_lenient(&req.access_token, TokenKind::Access)
        .map_err(|_| AppError::Unauthorized)?;
    let renewal = state
        .codec
        .decode_lenient(&req.renewal_token, TokenKind::Renewal)
        .map_err(|_| AppError::Unauthorized)?;

    let flags = state
        .tokens
        .status(&access.unique_id, &renewal.unique_id, &req.subject)
        .await?;
    Ok(success_to_api_response(StatusResponse {
        state: flags.state(),
        flags,
    }))
}
