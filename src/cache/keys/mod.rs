/// 缓存键模块
/// 提供令牌关联记录的键生成函数
pub mod token_keys;

pub use token_keys::{access_key, renewal_key};
