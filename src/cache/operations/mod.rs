/// 缓存操作
/// 提供令牌签发、续期、注销与状态查询
pub mod token;

pub use token::TokenCache;
