use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use super::{ExpiringStore, StoreError};

/// 进程内存储，过期时间跟随 tokio 时钟
///
/// 用于本地开发（`memory://`）和测试，不跨进程共享。
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, (String, Instant)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, (String, Instant)>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }

    /// 当前保存的条目数，包括尚未清理的过期条目
    #[cfg(test)]
    pub(crate) fn stored_entries(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}

/// 取出未过期的值，顺带清理已过期的键
fn live_value(
    entries: &mut HashMap<String, (String, Instant)>,
    key: &str,
    now: Instant,
) -> Option<String> {
    match entries.get(key) {
        Some((value, deadline)) if *deadline > now => Some(value.clone()),
        Some(_) => {
            entries.remove(key);
            None
        }
        None => None,
    }
}

#[async_trait]
impl ExpiringStore for MemoryStore {
    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        // 写入时清理所有过期键，未再被读取的键也会被释放
        entries.retain(|_, (_, deadline)| *deadline > now);
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(true)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        Ok(live_value(&mut entries, key, now))
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        let existed = live_value(&mut entries, key, now).is_some();
        entries.remove(key);
        Ok(existed)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.lock().map(|_| ())
    }
}
