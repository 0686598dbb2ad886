use serde::Serialize;

/// 会话所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Fresh,
    AccessExpired,
    Dead,
}

/// 令牌状态，由状态查询一次性构造，调用方只读
///
/// 必须先检查 `is_login_expired`：登录过期时其余两个标志不会被计算。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenStatus {
    access_expired: bool,
    login_expired: bool,
    identity_mismatch: bool,
}

impl TokenStatus {
    /// 续期记录已不存在，整个会话失效
    pub(crate) fn dead(access_expired: bool) -> Self {
        Self {
            access_expired,
            login_expired: true,
            identity_mismatch: false,
        }
    }

    pub(crate) fn live(access_expired: bool, identity_mismatch: bool) -> Self {
        Self {
            access_expired,
            login_expired: false,
            identity_mismatch,
        }
    }

    pub fn is_access_expired(&self) -> bool {
        self.access_expired
    }

    pub fn is_login_expired(&self) -> bool {
        self.login_expired
    }

    pub fn is_identity_mismatch(&self) -> bool {
        self.identity_mismatch
    }

    /// 没有任何标志被设置
    pub fn is_valid(&self) -> bool {
        !(self.access_expired || self.login_expired || self.identity_mismatch)
    }

    pub fn state(&self) -> SessionState {
        if self.login_expired {
            SessionState::Dead
        } else if self.access_expired {
            SessionState::AccessExpired
        } else {
            SessionState::Fresh
        }
    }
}
