use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::CacheConfig;

pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl MokaCacheWrapper {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, ttl: {:?}",
            max_capacity, ttl
        );
        Self { inner }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_capacity, Duration::from_secs(config.default_ttl))
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(value) => CacheResult::Found(value),
            None => {
                debug!("Key not found in cache: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String) {
        // TTL 在构建时统一设置
        self.inner.insert(key, value).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaCacheWrapper::new(16, Duration::from_secs(60));
        assert_eq!(cache.get_raw("user:t").await, CacheResult::NotFound);

        cache.insert_raw("user:t".to_string(), "{}".to_string()).await;
        assert_eq!(
            cache.get_raw("user:t").await,
            CacheResult::Found("{}".to_string())
        );

        cache.remove("user:t").await;
        assert_eq!(cache.get_raw("user:t").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = MokaCacheWrapper::new(16, Duration::from_millis(50));
        cache.insert_raw("k".to_string(), "v".to_string()).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(cache.get_raw("k").await, CacheResult::NotFound);
    }
}
