use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::{AppState, error::AppError};

/// 可信调用方在这个头里携带服务密钥
pub const SERVICE_SECRET_HEADER: &str = "x-service-secret";

pub async fn service_auth_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let presented = req
        .headers()
        .get(SERVICE_SECRET_HEADER)
        .map(|h| h.as_bytes())
        .unwrap_or_default();

    if !secrets_match(presented, state.config.service_secret.as_bytes()) {
        tracing::warn!("Rejected {} without a valid service secret", req.uri().path());
        return Err(AppError::Unauthorized);
    }
    Ok(next.run(req).await)
}

/// 比较耗时与内容无关
fn secrets_match(presented: &[u8], expected: &[u8]) -> bool {
    if expected.is_empty() || presented.len() != expected.len() {
        return false;
    }
    presented
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
