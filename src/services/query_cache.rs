use std::{collections::HashMap, fmt::Debug, future::Future, hash::Hash};

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::errors::{AppError, AppResult};

type SharedFetch<V> = Shared<BoxFuture<'static, AppResult<V>>>;

enum CacheEntry<V: Clone> {
    Loading(SharedFetch<V>),
    Success(V),
    Error(AppError),
}

/// Snapshot of one cache entry, for callers that branch on the fetch state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum QueryStatus {
    Idle,
    Loading,
    Error(String),
    Success,
}

/// Memoized fetches keyed by their input. Concurrent fetches for the same key
/// share one in-flight future; a settled value is served until `invalidate`.
pub struct QueryCache<K, V: Clone> {
    name: &'static str,
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key`, joins an in-flight fetch for it, or
    /// starts `fetcher`. An entry that previously failed is fetched again.
    pub async fn fetch<F, Fut>(&self, key: K, fetcher: F) -> AppResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<V>> + Send + 'static,
    {
        let pending = {
            let mut entries = self.entries.lock().await;
            match entries.get(&key) {
                Some(CacheEntry::Success(value)) => {
                    log::debug!("[{}] cache hit for {:?}", self.name, key);
                    return Ok(value.clone());
                }
                Some(CacheEntry::Loading(pending)) => {
                    log::debug!("[{}] joining in-flight fetch for {:?}", self.name, key);
                    pending.clone()
                }
                Some(CacheEntry::Error(_)) | None => {
                    log::debug!("[{}] cache miss for {:?}", self.name, key);
                    let pending = fetcher().boxed().shared();
                    entries.insert(key.clone(), CacheEntry::Loading(pending.clone()));
                    pending
                }
            }
        };

        let result = pending.clone().await;

        let mut entries = self.entries.lock().await;
        // Only settle the entry this fetch created; it may have been invalidated meanwhile.
        let still_current = matches!(
            entries.get(&key),
            Some(CacheEntry::Loading(current)) if current.ptr_eq(&pending)
        );
        if still_current {
            let settled = match &result {
                Ok(value) => CacheEntry::Success(value.clone()),
                Err(err) => {
                    log::warn!("[{}] fetch for {:?} failed: {}", self.name, key, err);
                    CacheEntry::Error(err.clone())
                }
            };
            entries.insert(key, settled);
        }

        result
    }

    /// Drops the entry so the next `fetch` performs a fresh round-trip.
    pub async fn invalidate(&self, key: &K) -> bool {
        let removed = self.entries.lock().await.remove(key).is_some();
        if removed {
            log::info!("[{}] invalidated {:?}", self.name, key);
        }
        removed
    }

    pub async fn status(&self, key: &K) -> QueryStatus {
        match self.entries.lock().await.get(key) {
            None => QueryStatus::Idle,
            Some(CacheEntry::Loading(_)) => QueryStatus::Loading,
            Some(CacheEntry::Success(_)) => QueryStatus::Success,
            Some(CacheEntry::Error(err)) => QueryStatus::Error(err.to_string()),
        }
    }

    pub async fn cached(&self, key: &K) -> Option<V> {
        match self.entries.lock().await.get(key) {
            Some(CacheEntry::Success(value)) => Some(value.clone()),
            _ => None,
        }
    }
}
