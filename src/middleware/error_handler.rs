use axum::{
    body::{Body, to_bytes},
    http::Request,
    middleware::Next,
    response::Response,
};

/// 错误响应体最多记录这么多字节
const MAX_LOGGED_BODY: usize = 1024;

/// 记录服务端错误（含缓存不可用）以及认证失败
pub async fn log_errors(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let response = next.run(req).await;
    let status = response.status();

    if status.is_client_error() {
        tracing::debug!("{} {} rejected with {}", method, path, status);
        return response;
    }
    if !status.is_server_error() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_LOGGED_BODY).await {
        Ok(b) => b,
        Err(e) => {
            tracing::error!("{} {} failed with {}, body unreadable: {}", method, path, status, e);
            return Response::from_parts(parts, Body::empty());
        }
    };

    tracing::error!(
        "{} {} failed with {}: {}",
        method,
        path,
        status,
        String::from_utf8_lossy(&bytes)
    );

    // body 已被读出，重新构建响应
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(bytes))
}
