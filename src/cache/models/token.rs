use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use crate::config::ConfigError;
use crate::utils::{TokenCodec, TokenCodecError};

/// 令牌类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Renewal,
}

/// 令牌身份：主体、角色、唯一ID以及过期时间
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub subject: String,
    pub role: u32,
    pub unique_id: String,
    pub expires_at: i64, // Unix timestamp
}

impl TokenIdentity {
    /// 签发新身份，每次调用都会生成新的唯一ID
    pub fn new(subject: &str, role: u32, ttl: Duration) -> Self {
        let expires_at = chrono::Utc::now().timestamp() + ttl.as_secs() as i64;
        Self {
            subject: subject.to_string(),
            role,
            unique_id: Uuid::new_v4().to_string(),
            expires_at,
        }
    }

    /// 角色是否不低于要求的级别
    pub fn has_elevation(&self, min_role: u32) -> bool {
        self.role >= min_role
    }
}

/// 会话的两个生存时间，续期令牌必须比访问令牌活得更久
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTtl {
    access: Duration,
    renewal: Duration,
}

impl SessionTtl {
    pub fn new(access: Duration, renewal: Duration) -> Result<Self, ConfigError> {
        if access.is_zero() {
            return Err(ConfigError::InvalidTtl(
                "access ttl must be greater than zero".into(),
            ));
        }
        if renewal <= access {
            return Err(ConfigError::InvalidTtl(format!(
                "renewal ttl ({}s) must exceed access ttl ({}s)",
                renewal.as_secs_f64(),
                access.as_secs_f64()
            )));
        }
        Ok(Self { access, renewal })
    }

    pub fn access(&self) -> Duration {
        self.access
    }

    pub fn renewal(&self) -> Duration {
        self.renewal
    }
}

/// 一次签发得到的令牌对
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: TokenIdentity,
    pub renewal: TokenIdentity,
}

/// 可传输的已签名令牌对
#[derive(Debug, Clone, Serialize)]
pub struct SignedTokenPair {
    pub access_token: String,
    pub renewal_token: String,
}

impl TokenPair {
    pub fn sign(&self, codec: &TokenCodec) -> Result<SignedTokenPair, TokenCodecError> {
        Ok(SignedTokenPair {
            access_token: codec.encode(&self.access, TokenKind::Access)?,
            renewal_token: codec.encode(&self.renewal, TokenKind::Renewal)?,
        })
    }
}
