/// 缓存数据模型
/// 定义令牌身份与状态
pub mod status;
pub mod token;

// 重新导出常用类型
pub use status::{SessionState, TokenStatus};
pub use token::{SessionTtl, SignedTokenPair, TokenIdentity, TokenKind, TokenPair};
