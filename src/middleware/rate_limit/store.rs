use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// 키 하나의 요청 기록
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitItem {
    hits: u64,
    window_start: Instant,
}

impl RateLimitItem {
    fn new() -> Self {
        Self {
            hits: 1,
            window_start: Instant::now(),
        }
    }

    fn increment(&mut self) {
        self.hits += 1;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn window_start(&self) -> Instant {
        self.window_start
    }

    /// 윈도우 시작 후 `window`보다 오래 지났는지 확인합니다.
    pub fn expired(&self, window: Duration) -> bool {
        self.window_start.elapsed() > window
    }
}

/// 속도 제한 저장소 trait
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// 요청 한 건을 기록합니다.
    async fn record_hit(&self, key: &str);

    /// 키가 현재 윈도우 안에서 한도에 도달했는지 확인합니다.
    async fn is_limited(&self, key: &str, window: Duration, limit: u64) -> bool;

    async fn remove(&self, key: &str);

    async fn get(&self, key: &str) -> Option<RateLimitItem>;

    async fn contains(&self, key: &str) -> bool {
        self.get(key).await.is_some()
    }
}

/// 메모리 기반 저장소
///
/// 모든 키가 하나의 잠금을 공유합니다. 만료는 읽을 때만 판단하며 별도의 정리
/// 작업은 없습니다.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Arc<Mutex<HashMap<String, RateLimitItem>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }
}

#[async_trait]
impl RateLimitStore for MemoryStore {
    async fn record_hit(&self, key: &str) {
        let mut items = self.items.lock().await;

        // 만료된 항목도 초기화하지 않고 그대로 증가시킨다
        match items.get_mut(key) {
            Some(item) => item.increment(),
            None => {
                debug!(key = %key, "새로운 요청 기록 생성");
                items.insert(key.to_string(), RateLimitItem::new());
            }
        }
    }

    async fn is_limited(&self, key: &str, window: Duration, limit: u64) -> bool {
        let items = self.items.lock().await;

        match items.get(key) {
            None => false,
            Some(item) if item.expired(window) => false,
            Some(item) => item.hits >= limit,
        }
    }

    async fn remove(&self, key: &str) {
        self.items.lock().await.remove(key);
    }

    async fn get(&self, key: &str) -> Option<RateLimitItem> {
        self.items.lock().await.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_new_item() {
        let mut item = RateLimitItem::new();
        assert_eq!(item.hits(), 1);
        item.increment();
        assert_eq!(item.hits(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_item_expired() {
        let item = RateLimitItem::new();
        assert!(!item.expired(Duration::from_secs(1)));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(item.expired(Duration::ZERO));
        assert!(!item.expired(Duration::from_secs(1)));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(item.expired(Duration::from_secs(1)));
    }

    #[tokio::test]
    async fn test_store_record_and_get() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);
        assert!(!store.contains("1").await);

        store.record_hit("1").await;
        assert!(store.contains("1").await);
        assert_eq!(store.get("1").await.map(|i| i.hits()), Some(1));

        store.record_hit("1").await;
        assert_eq!(store.get("1").await.map(|i| i.hits()), Some(2));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_limited() {
        let store = MemoryStore::new();
        store.record_hit("1").await;

        assert!(store.is_limited("1", Duration::from_secs(60), 1).await);
        assert!(!store.is_limited("1", Duration::from_secs(60), 2).await);
        assert!(!store.is_limited("2", Duration::from_secs(60), 1).await);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(!store.is_limited("1", Duration::from_secs(60), 1).await);
        // 읽기만으로는 항목이 지워지지 않는다
        assert!(store.contains("1").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_item_keeps_counting() {
        let store = MemoryStore::new();
        store.record_hit("k").await;
        tokio::time::advance(Duration::from_secs(120)).await;

        store.record_hit("k").await;
        let item = store.get("k").await.unwrap();
        assert_eq!(item.hits(), 2);
        assert!(item.expired(Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn test_store_remove() {
        let store = MemoryStore::new();
        store.record_hit("1").await;
        store.remove("1").await;
        assert!(!store.contains("1").await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_hits_are_not_lost() {
        let store = MemoryStore::new();
        let mut tasks = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..25 {
                    store.record_hit("shared").await;
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(store.get("shared").await.map(|i| i.hits()), Some(200));
    }
}
