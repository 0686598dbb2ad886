// 缓存模块
// 包含令牌关联记录的键、数据结构、存储实现和操作逻辑

pub mod keys;
pub mod models;
pub mod operations;
pub mod store;

// 重新导出常用类型，方便其他模块使用
pub use models::{SessionState, SessionTtl, SignedTokenPair, TokenIdentity, TokenKind, TokenPair, TokenStatus};
pub use operations::TokenCache;
pub use store::{ExpiringStore, MemoryStore, RedisStore, StoreError};
