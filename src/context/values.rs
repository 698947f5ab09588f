use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::middleware::{Error, Lookup, Result};

type Slot = Arc<dyn Any + Send + Sync>;

/// 요청 단위 값 저장소
///
/// 복제본은 같은 맵을 가리키므로 핸들러가 띄운 백그라운드 작업에 넘길 수
/// 있습니다. 모든 접근은 하나의 배타적 잠금을 거칩니다.
#[derive(Clone, Default)]
pub struct Values {
    inner: Arc<Mutex<HashMap<String, Slot>>>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set<T>(&self, key: impl Into<String>, value: T)
    where
        T: Any + Send + Sync,
    {
        self.inner.lock().await.insert(key.into(), Arc::new(value));
    }

    /// 값을 꺼내 요청한 타입으로 다운캐스트합니다.
    pub async fn get<T>(&self, key: &str) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let slot = self
            .inner
            .lock()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| Error::not_found(Lookup::Value, key))?;

        slot.downcast::<T>().map_err(|_| Error::TypeMismatch {
            key: key.to_string(),
        })
    }

    pub async fn remove(&self, key: &str) -> bool {
        self.inner.lock().await.remove(key).is_some()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.inner.lock().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}
