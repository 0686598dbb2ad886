use axum::Json;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::cache::models::{TokenIdentity, TokenKind};
use crate::result::ApiResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: String, // 主体
    pub role: u32,    // 角色级别
    pub uuid: String, // 令牌唯一ID，同时是缓存记录的键
    pub exp: i64,     // 过期时间
}

pub type TokenCodecError = jsonwebtoken::errors::Error;

/// 令牌编解码，访问令牌和续期令牌使用不同的密钥
#[derive(Clone)]
pub struct TokenCodec {
    access_secret: String,
    renewal_secret: String,
}

impl TokenCodec {
    pub fn new(access_secret: &str, renewal_secret: &str) -> Self {
        Self {
            access_secret: access_secret.to_string(),
            renewal_secret: renewal_secret.to_string(),
        }
    }

    fn secret(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => self.access_secret.as_bytes(),
            TokenKind::Renewal => self.renewal_secret.as_bytes(),
        }
    }

    pub fn encode(
        &self,
        identity: &TokenIdentity,
        kind: TokenKind,
    ) -> Result<String, TokenCodecError> {
        let claims = Claims {
            user: identity.subject.clone(),
            role: identity.role,
            uuid: identity.unique_id.clone(),
            exp: identity.expires_at,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret(kind)),
        )
    }

    /// 校验签名和过期时间
    pub fn decode(&self, token: &str, kind: TokenKind) -> Result<TokenIdentity, TokenCodecError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        self.decode_with(token, kind, &validation)
    }

    /// 只校验签名；过期与否以缓存为准
    pub fn decode_lenient(
        &self,
        token: &str,
        kind: TokenKind,
    ) -> Result<TokenIdentity, TokenCodecError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        self.decode_with(token, kind, &validation)
    }

    fn decode_with(
        &self,
        token: &str,
        kind: TokenKind,
        validation: &Validation,
    ) -> Result<TokenIdentity, TokenCodecError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret(kind)),
            validation,
        )?;

        let claims = token_data.claims;
        Ok(TokenIdentity {
            subject: claims.user,
            role: claims.role,
            unique_id: claims.uuid,
            expires_at: claims.exp,
        })
    }
}

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResult<T>> {
    Json(ApiResult::success(data))
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const AUTH_FAILED: i32 = 1002;
    pub const PERMISSION_DENIED: i32 = 1003;
    pub const ACCESS_EXPIRED: i32 = 1006;
    pub const LOGIN_EXPIRED: i32 = 1007;
    pub const IDENTITY_MISMATCH: i32 = 1008;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const CACHE_ERROR: i32 = 5001;
}
