use std::sync::Arc;

use crate::cache::keys::{access_key, renewal_key};
use crate::cache::models::{SessionTtl, TokenIdentity, TokenPair, TokenStatus};
use crate::cache::store::ExpiringStore;
use crate::error::CacheError;

/// 令牌缓存操作
///
/// 一次登录在缓存中写入两条记录：
/// - 访问令牌ID -> 续期令牌ID，生存时间为访问令牌时长
/// - 续期令牌ID -> 主体，生存时间为续期令牌时长
///
/// 会话的全部状态都在缓存里，记录过期即会话结束。
#[derive(Clone)]
pub struct TokenCache {
    store: Arc<dyn ExpiringStore>,
}

impl TokenCache {
    pub fn new(store: Arc<dyn ExpiringStore>) -> Self {
        Self { store }
    }

    /// 签发新令牌对并写入两条关联记录
    ///
    /// 第一条写入失败时立即返回，不会尝试第二条；第二条失败时第一条保留在缓存中。
    pub async fn issue(
        &self,
        subject: &str,
        role: u32,
        ttl: &SessionTtl,
    ) -> Result<TokenPair, CacheError> {
        let pair = TokenPair {
            access: TokenIdentity::new(subject, role, ttl.access()),
            renewal: TokenIdentity::new(subject, role, ttl.renewal()),
        };

        let key = access_key(&pair.access.unique_id);
        if !self
            .store
            .set_if_absent(&key, &pair.renewal.unique_id, ttl.access())
            .await?
        {
            tracing::warn!("Refused to overwrite existing access record {}", key);
            return Err(CacheError::Collision(key));
        }

        let key = renewal_key(&pair.renewal.unique_id);
        if !self
            .store
            .set_if_absent(&key, &pair.renewal.subject, ttl.renewal())
            .await?
        {
            tracing::warn!("Refused to overwrite existing renewal record {}", key);
            return Err(CacheError::Collision(key));
        }

        tracing::debug!(
            "Issued token pair for {} (access {}, renewal {})",
            subject,
            pair.access.unique_id,
            pair.renewal.unique_id
        );
        Ok(pair)
    }

    /// 用续期令牌换取新令牌对
    ///
    /// 旧续期记录先被删除，保证同一个续期令牌只能使用一次。
    /// 记录已经过期或已被使用时返回 `None`，此时不会签发新会话。
    pub async fn renew(
        &self,
        renewal: &TokenIdentity,
        ttl: &SessionTtl,
    ) -> Result<Option<TokenPair>, CacheError> {
        let consumed = self.store.delete(&renewal_key(&renewal.unique_id)).await?;
        if !consumed {
            tracing::debug!(
                "Renewal token {} expired or already used",
                renewal.unique_id
            );
            return Ok(None);
        }

        let pair = self.issue(&renewal.subject, renewal.role, ttl).await?;
        Ok(Some(pair))
    }

    /// 注销：删除两条关联记录，不关心记录是否存在
    pub async fn revoke(&self, access_id: &str, renewal_id: &str) {
        for key in [access_key(access_id), renewal_key(renewal_id)] {
            if let Err(e) = self.store.delete(&key).await {
                tracing::warn!("Failed to remove cache record {}: {}", key, e);
            }
        }
    }

    /// 查询令牌状态
    ///
    /// 记录不存在视为过期而不是错误；只有缓存本身查询失败才返回错误。
    pub async fn status(
        &self,
        access_id: &str,
        renewal_id: &str,
        claimed_subject: &str,
    ) -> Result<TokenStatus, CacheError> {
        let access_expired = self.store.get(&access_key(access_id)).await?.is_none();

        let bound_subject = match self.store.get(&renewal_key(renewal_id)).await? {
            Some(subject) => subject,
            // 续期记录不存在，会话已无法恢复，不再比较主体
            None => return Ok(TokenStatus::dead(access_expired)),
        };

        Ok(TokenStatus::live(
            access_expired,
            bound_subject != claimed_subject,
        ))
    }

    pub async fn ping(&self) -> Result<(), CacheError> {
        self.store.ping().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::cache::models::SessionState;
    use crate::cache::store::{MemoryStore, StoreError};

    fn ttl() -> SessionTtl {
        SessionTtl::new(Duration::from_secs(10), Duration::from_secs(60)).unwrap()
    }

    fn cache_with(store: MemoryStore) -> TokenCache {
        TokenCache::new(Arc::new(store))
    }

    async fn status_of(cache: &TokenCache, pair: &TokenPair, subject: &str) -> TokenStatus {
        cache
            .status(&pair.access.unique_id, &pair.renewal.unique_id, subject)
            .await
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn session_walks_from_fresh_to_dead() {
        let cache = cache_with(MemoryStore::new());
        let pair = cache.issue("u1", 0, &ttl()).await.unwrap();
        assert_eq!(pair.access.subject, "u1");
        assert_eq!(pair.renewal.subject, "u1");
        assert_ne!(pair.access.unique_id, pair.renewal.unique_id);

        let status = status_of(&cache, &pair, "u1").await;
        assert!(status.is_valid());

        tokio::time::advance(Duration::from_secs(11)).await;
        let status = status_of(&cache, &pair, "u1").await;
        assert!(status.is_access_expired());
        assert!(!status.is_login_expired());
        assert!(!status.is_identity_mismatch());
        assert_eq!(status.state(), SessionState::AccessExpired);

        tokio::time::advance(Duration::from_secs(50)).await;
        let status = status_of(&cache, &pair, "u1").await;
        assert!(status.is_login_expired());
        assert_eq!(status.state(), SessionState::Dead);
    }

    #[tokio::test]
    async fn claimed_subject_must_match_renewal_record() {
        let cache = cache_with(MemoryStore::new());
        let pair = cache.issue("a", 0, &ttl()).await.unwrap();

        let status = status_of(&cache, &pair, "b").await;
        assert!(status.is_identity_mismatch());
        assert!(!status.is_access_expired());
        assert!(!status.is_login_expired());
    }

    #[tokio::test]
    async fn dead_session_skips_identity_check() {
        let cache = cache_with(MemoryStore::new());
        let pair = cache.issue("a", 0, &ttl()).await.unwrap();
        cache
            .revoke(&pair.access.unique_id, &pair.renewal.unique_id)
            .await;

        let status = status_of(&cache, &pair, "b").await;
        assert!(status.is_login_expired());
        assert!(!status.is_identity_mismatch());
    }

    #[tokio::test]
    async fn renewal_replaces_the_session() {
        let cache = cache_with(MemoryStore::new());
        let old = cache.issue("u1", 3, &ttl()).await.unwrap();

        let new = cache.renew(&old.renewal, &ttl()).await.unwrap().unwrap();
        assert_eq!(new.access.subject, "u1");
        assert_eq!(new.access.role, 3);
        assert_ne!(new.access.unique_id, old.access.unique_id);
        assert_ne!(new.renewal.unique_id, old.renewal.unique_id);

        assert!(status_of(&cache, &old, "u1").await.is_login_expired());
        assert!(status_of(&cache, &new, "u1").await.is_valid());
    }

    #[tokio::test]
    async fn renewal_token_is_single_use() {
        let cache = cache_with(MemoryStore::new());
        let pair = cache.issue("u1", 0, &ttl()).await.unwrap();

        assert!(cache.renew(&pair.renewal, &ttl()).await.unwrap().is_some());
        assert!(cache.renew(&pair.renewal, &ttl()).await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_renewal_token_does_not_mint_a_session() {
        let cache = cache_with(MemoryStore::new());
        let pair = cache.issue("u1", 0, &ttl()).await.unwrap();

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(cache.renew(&pair.renewal, &ttl()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn revoke_is_immediate_and_idempotent() {
        let cache = cache_with(MemoryStore::new());
        let pair = cache.issue("u1", 0, &ttl()).await.unwrap();

        cache
            .revoke(&pair.access.unique_id, &pair.renewal.unique_id)
            .await;
        let status = status_of(&cache, &pair, "u1").await;
        assert!(status.is_login_expired());

        cache
            .revoke(&pair.access.unique_id, &pair.renewal.unique_id)
            .await;
        cache.revoke("unknown", "unknown").await;
    }

    /// 前 `accept` 次写入之后全部拒绝，模拟唯一ID冲突
    struct RefusingStore {
        inner: MemoryStore,
        accept: usize,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl ExpiringStore for RefusingStore {
        async fn set_if_absent(
            &self,
            key: &str,
            value: &str,
            ttl: Duration,
        ) -> Result<bool, StoreError> {
            if self.writes.fetch_add(1, Ordering::SeqCst) >= self.accept {
                return Ok(false);
            }
            self.inner.set_if_absent(key, value, ttl).await
        }

        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key).await
        }

        async fn delete(&self, key: &str) -> Result<bool, StoreError> {
            self.inner.delete(key).await
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn collision_on_first_write_stops_issuance() {
        let store = Arc::new(RefusingStore {
            inner: MemoryStore::new(),
            accept: 0,
            writes: AtomicUsize::new(0),
        });
        let cache = TokenCache::new(store.clone());

        let err = cache.issue("u1", 0, &ttl()).await.unwrap_err();
        assert!(matches!(err, CacheError::Collision(ref key) if key.starts_with("token:access:")));
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn collision_on_second_write_leaves_first_record() {
        let store = Arc::new(RefusingStore {
            inner: MemoryStore::new(),
            accept: 1,
            writes: AtomicUsize::new(0),
        });
        let cache = TokenCache::new(store.clone());

        let err = cache.issue("u1", 0, &ttl()).await.unwrap_err();
        assert!(matches!(err, CacheError::Collision(ref key) if key.starts_with("token:renewal:")));
        assert_eq!(store.writes.load(Ordering::SeqCst), 2);
    }

    /// 任何查询都失败，模拟缓存不可达
    struct BrokenStore;

    #[async_trait]
    impl ExpiringStore for BrokenStore {
        async fn set_if_absent(&self, _: &str, _: &str, _: Duration) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        async fn get(&self, _: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        async fn delete(&self, _: &str) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn unreachable_cache_fails_closed() {
        let cache = TokenCache::new(Arc::new(BrokenStore));

        assert!(matches!(
            cache.status("a", "r", "u1").await,
            Err(CacheError::Store(_))
        ));
        assert!(matches!(
            cache.issue("u1", 0, &ttl()).await,
            Err(CacheError::Store(_))
        ));
        assert!(cache.ping().await.is_err());
        // 注销是尽力而为，不会报错
        cache.revoke("a", "r").await;
    }

    /// 访问记录正常读写，续期记录的任何操作都失败
    struct RenewalOutageStore {
        inner: MemoryStore,
    }

    fn renewal_outage(key: &str) -> Result<(), StoreError> {
        if key.starts_with("token:renewal:") {
            return Err(StoreError::Unavailable("replica down".into()));
        }
        Ok(())
    }

    #[async_trait]
    impl ExpiringStore for RenewalOutageStore {
        async fn set_if_absent(
            &self,
            key: &str,
            value: &str,
            ttl: Duration,
        ) -> Result<bool, StoreError> {
            renewal_outage(key)?;
            self.inner.set_if_absent(key, value, ttl).await
        }

        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            renewal_outage(key)?;
            self.inner.get(key).await
        }

        async fn delete(&self, key: &str) -> Result<bool, StoreError> {
            renewal_outage(key)?;
            self.inner.delete(key).await
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn renewal_lookup_failure_returns_no_flags() {
        let inner = MemoryStore::new();
        inner
            .set_if_absent(&access_key("a1"), "r1", Duration::from_secs(10))
            .await
            .unwrap();
        let cache = TokenCache::new(Arc::new(RenewalOutageStore { inner }));

        assert!(matches!(
            cache.status("a1", "r1", "u1").await,
            Err(CacheError::Store(_))
        ));
    }

    #[tokio::test]
    async fn renewal_write_failure_keeps_the_access_record() {
        let inner = MemoryStore::new();
        let cache = TokenCache::new(Arc::new(RenewalOutageStore {
            inner: inner.clone(),
        }));

        assert!(matches!(
            cache.issue("u1", 0, &ttl()).await,
            Err(CacheError::Store(_))
        ));
        assert_eq!(inner.stored_entries(), 1);
    }

    #[tokio::test]
    async fn renew_surfaces_delete_failure() {
        let cache = TokenCache::new(Arc::new(RenewalOutageStore {
            inner: MemoryStore::new(),
        }));
        let renewal = TokenIdentity::new("u1", 0, Duration::from_secs(60));

        assert!(matches!(
            cache.renew(&renewal, &ttl()).await,
            Err(CacheError::Store(_))
        ));
    }
}
