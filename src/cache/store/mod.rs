// 过期键值存储
// 令牌缓存只依赖这四个原子操作
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub mod memory;
pub mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ExpiringStore: Send + Sync {
    /// 键不存在时写入并设置过期时间，返回是否写入成功
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration)
    -> Result<bool, StoreError>;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// 删除键，返回是否确实删除了记录；键不存在不算错误
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// 根据连接地址选择存储实现，`memory://` 使用进程内存储
pub fn open(url: &str) -> Result<Arc<dyn ExpiringStore>, StoreError> {
    if url.starts_with("memory://") {
        tracing::warn!("Using in-process token store, sessions are not shared between instances");
        return Ok(Arc::new(MemoryStore::new()));
    }
    Ok(Arc::new(RedisStore::open(url)?))
}
