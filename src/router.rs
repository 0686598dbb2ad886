use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    AppState,
    middleware::{auth_middleware, log_errors, service_auth_middleware},
    routes,
};

// 签发令牌只对持有服务密钥的调用方开放，例如完成密码校验的账号服务
pub fn issuer_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/tokens/issue", post(routes::token::issue))
        .layer(axum::middleware::from_fn_with_state(
            state,
            service_auth_middleware,
        ))
}

// 客户端凭令牌自行调用的路由
pub fn token_routes() -> Router<AppState> {
    Router::new()
        .route("/tokens/renew", post(routes::token::renew))
        .route("/tokens/revoke", post(routes::token::revoke))
        .route("/tokens/status", post(routes::token::status))
        .route("/health", get(routes::session::health))
}

// 需要认证的路由
pub fn session_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/session/whoami", get(routes::session::whoami))
        .route("/session/elevated", get(routes::session::elevated))
        .layer(axum::middleware::from_fn_with_state(state, auth_middleware))
}

// 创建主路由
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(issuer_routes(state.clone()))
        .merge(token_routes())
        .merge(session_routes(state.clone()));

    let base = state.config.api_base_uri.trim_end_matches('/');
    let router = if base.is_empty() {
        api
    } else {
        Router::new().nest(base, api)
    };

    router
        .layer(axum::middleware::from_fn(log_errors))
        .with_state(state)
}
