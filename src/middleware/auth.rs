use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};

use crate::{
    AppState,
    cache::models::{TokenIdentity, TokenKind},
    error::AppError,
};

/// 续期令牌随请求放在这个头里，状态查询需要两个令牌的ID
pub const RENEWAL_TOKEN_HEADER: &str = "x-renewal-token";

/// 通过认证后放入请求扩展
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub access: TokenIdentity,
    pub renewal_id: String,
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|_| AppError::Unauthorized)?;
    let renewal_token = req
        .headers()
        .get(RENEWAL_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    // 签名必须有效，过期由缓存判断
    let access = state
        .codec
        .decode_lenient(bearer.token(), TokenKind::Access)
        .map_err(|_| AppError::Unauthorized)?;
    let renewal = state
        .codec
        .decode_lenient(renewal_token, TokenKind::Renewal)
        .map_err(|_| AppError::Unauthorized)?;

    let status = state
        .tokens
        .status(&access.unique_id, &renewal.unique_id, &access.subject)
        .await?;

    if status.is_login_expired() {
        return Err(AppError::LoginExpired);
    }
    if status.is_access_expired() {
        return Err(AppError::AccessExpired);
    }
    if status.is_identity_mismatch() {
        tracing::warn!(
            "Access token {} presented with renewal token of another subject",
            access.unique_id
        );
        return Err(AppError::IdentityMismatch);
    }

    req.extensions_mut().insert(AuthContext {
        access,
        renewal_id: renewal.unique_id,
    });
    Ok(next.run(req).await)
}
