use std::env;
use std::time::Duration;

use crate::cache::models::SessionTtl;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(#[from] env::VarError),
    #[error("invalid token ttl: {0}")]
    InvalidTtl(String),
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub redis_url: String,
    pub access_token_secret: String,
    pub renewal_token_secret: String,
    pub service_secret: String,
    pub access_ttl_secs: u64,
    pub renewal_ttl_secs: u64,
    pub elevated_role: u32,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let config = Config {
            redis_url: env::var("REDIS_URL")?,
            access_token_secret: env::var("ACCESS_TOKEN_SECRET")?,
            renewal_token_secret: env::var("RENEWAL_TOKEN_SECRET")?,
            service_secret: env::var("SERVICE_SECRET")?,
            access_ttl_secs: parse_secs(env::var("ACCESS_TTL").ok(), 70),
            renewal_ttl_secs: parse_secs(env::var("RENEWAL_TTL").ok(), 140),
            elevated_role: env::var("ELEVATED_ROLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "::".into()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            api_base_uri: env::var("API_BASE_URI").unwrap_or_else(|_| "/api".into()),
        };

        // 启动时就拒绝不合法的时长组合
        config.session_ttl()?;
        Ok(config)
    }

    pub fn session_ttl(&self) -> Result<SessionTtl, ConfigError> {
        SessionTtl::new(
            Duration::from_secs(self.access_ttl_secs),
            Duration::from_secs(self.renewal_ttl_secs),
        )
    }
}

/// 接受 "70" 或 "70s" 形式的秒数
fn parse_secs(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().trim_end_matches('s').parse().ok())
        .unwrap_or(default)
}
