use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::cache::store::StoreError;
use crate::utils::error_codes;

/// 令牌缓存错误：存储不可用，或者新写入的键已存在
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache query failed: {0}")]
    Store(#[from] StoreError),
    #[error("cache record {0} already exists")]
    Collision(String),
}

#[derive(Debug)]
pub enum AppError {
    Unauthorized,
    AccessExpired,
    LoginExpired,
    IdentityMismatch,
    PermissionDenied,
    InvalidRequest(String),
    CacheUnavailable,
    InternalServerError,
}

#[derive(Serialize)]
struct ErrorResponse {
    code: i32,
    error_message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error_message) = match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                error_codes::AUTH_FAILED,
                "未授权访问".to_string(),
            ),
            AppError::AccessExpired => (
                StatusCode::UNAUTHORIZED,
                error_codes::ACCESS_EXPIRED,
                "访问令牌已过期，请续期".to_string(),
            ),
            AppError::LoginExpired => (
                StatusCode::UNAUTHORIZED,
                error_codes::LOGIN_EXPIRED,
                "登录已过期，请重新登录".to_string(),
            ),
            AppError::IdentityMismatch => (
                StatusCode::FORBIDDEN,
                error_codes::IDENTITY_MISMATCH,
                "令牌与用户不匹配".to_string(),
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                error_codes::PERMISSION_DENIED,
                "权限不足".to_string(),
            ),
            AppError::InvalidRequest(message) => (
                StatusCode::BAD_REQUEST,
                error_codes::VALIDATION_ERROR,
                message,
            ),
            AppError::CacheUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                error_codes::CACHE_ERROR,
                "缓存服务不可用".to_string(),
            ),
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                "内部服务器错误".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            code,
            error_message,
        });

        (status, body).into_response()
    }
}

impl From<CacheError> for AppError {
    fn from(err: CacheError) -> Self {
        tracing::error!("Token cache failure: {}", err);
        AppError::CacheUnavailable
    }
}
