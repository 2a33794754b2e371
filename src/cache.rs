//! Keyed list cache. Every mutation invalidates its entity key and the next
//! read re-fetches from the database. Entries also expire after a fixed
//! time-to-live so writes made by other processes show up eventually.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Investors,
    Startups,
    Mentors,
    Tools,
}

impl QueryKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKey::Investors => "investors",
            QueryKey::Startups => "startups",
            QueryKey::Mentors => "mentors",
            QueryKey::Tools => "tools",
        }
    }
}

#[derive(Default)]
struct Slot {
    // Bumped on every invalidation; a fetch only stores its result if the
    // generation it started under is still current.
    generation: u64,
    value: Option<(Instant, Arc<dyn Any + Send + Sync>)>,
}

pub struct QueryCache {
    slots: RwLock<HashMap<QueryKey, Slot>>,
    ttl: Duration,
}

impl QueryCache {
    /// A zero `ttl` disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// The cached value, unless it is missing or older than the TTL.
    pub async fn get<T: Send + Sync + 'static>(&self, key: QueryKey) -> Option<Arc<T>> {
        let slots = self.slots.read().await;
        let (stored_at, value) = slots.get(&key)?.value.as_ref()?;
        if stored_at.elapsed() >= self.ttl {
            return None;
        }
        value.clone().downcast::<T>().ok()
    }

    /// Returns the cached value for `key`, running `fetch` on a miss.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<Arc<T>, AppError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        if let Some(hit) = self.get::<T>(key).await {
            debug!("cache hit for {}", key.as_str());
            return Ok(hit);
        }
        debug!("cache miss for {}", key.as_str());

        let generation = self.generation(key).await;
        let value = Arc::new(fetch().await?);

        let mut slots = self.slots.write().await;
        let slot = slots.entry(key).or_default();
        if slot.generation == generation {
            slot.value = Some((Instant::now(), value.clone() as Arc<dyn Any + Send + Sync>));
        } else {
            debug!("discarding stale fetch for {}", key.as_str());
        }
        Ok(value)
    }

    pub async fn invalidate(&self, key: QueryKey) {
        let mut slots = self.slots.write().await;
        let slot = slots.entry(key).or_default();
        slot.generation += 1;
        slot.value = None;
        debug!("invalidated {}", key.as_str());
    }

    async fn generation(&self, key: QueryKey) -> u64 {
        self.slots.read().await.get(&key).map_or(0, |slot| slot.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let list = cache
                .get_or_fetch(QueryKey::Tools, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec!["figma".to_string()])
                })
                .await
                .unwrap();
            assert_eq!(*list, vec!["figma".to_string()]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let cache = QueryCache::new(Duration::from_millis(20));
        let first = cache
            .get_or_fetch(QueryKey::Tools, || async { Ok(1u32) })
            .await
            .unwrap();
        assert_eq!(*first, 1);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get::<u32>(QueryKey::Tools).await.is_none());
        let second = cache
            .get_or_fetch(QueryKey::Tools, || async { Ok(2u32) })
            .await
            .unwrap();
        assert_eq!(*second, 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_fetches() {
        let cache = QueryCache::new(Duration::ZERO);
        let calls = AtomicUsize::new(0);
        for _ in 0..2 {
            cache
                .get_or_fetch(QueryKey::Startups, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(0u32)
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let first = cache
            .get_or_fetch(QueryKey::Investors, || async { Ok(1u32) })
            .await
            .unwrap();
        assert_eq!(*first, 1);

        cache.invalidate(QueryKey::Investors).await;
        let second = cache
            .get_or_fetch(QueryKey::Investors, || async { Ok(2u32) })
            .await
            .unwrap();
        assert_eq!(*second, 2);
    }

    #[tokio::test]
    async fn test_fetch_racing_invalidation_is_not_stored() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let value = cache
            .get_or_fetch(QueryKey::Mentors, || async {
                cache.invalidate(QueryKey::Mentors).await;
                Ok(7u32)
            })
            .await
            .unwrap();
        assert_eq!(*value, 7);
        assert!(cache.get::<u32>(QueryKey::Mentors).await.is_none());
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_cache_empty() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let result = cache
            .get_or_fetch::<u32, _, _>(QueryKey::Startups, || async {
                Err(AppError::InternalError("boom".to_string()))
            })
            .await;
        assert!(result.is_err());
        assert!(cache.get::<u32>(QueryKey::Startups).await.is_none());
    }
}
