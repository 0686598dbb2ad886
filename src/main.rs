use std::net::{IpAddr, SocketAddr};

use authcache::{
    AppState,
    cache::{ExpiringStore, store},
    config::Config,
    router::create_router,
};
#[cfg(debug_assertions)]
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // 设置令牌存储
    let token_store = store::open(&config.redis_url).expect("Failed to create token store");
    if let Err(e) = token_store.ping().await {
        tracing::warn!("Token store not reachable at startup: {}", e);
    }

    let state = AppState::new(config, token_store);
    let router = create_router(state.clone());

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(CorsLayer::permissive())
    };
    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    // 启动服务器
    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    tracing::info!(
        "Token service listening on {} (access ttl {}s, renewal ttl {}s)",
        addr,
        state.config.access_ttl_secs,
        state.config.renewal_ttl_secs
    );
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router,
    )
    .await
    .expect("Failed to start server");
}
