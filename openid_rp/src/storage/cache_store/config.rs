use std::{env, sync::Arc, sync::LazyLock};
use tokio::sync::Mutex;

use crate::storage::errors::StorageError;

use super::memory::InMemoryCacheStore;
use super::redis::RedisCacheStore;
use super::types::{CacheStore, SharedCacheStore};

pub(crate) static GENERIC_CACHE_STORE_TYPE: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_CACHE_STORE_TYPE").unwrap_or_else(|_| "memory".to_string())
});

pub(crate) static GENERIC_CACHE_STORE_URL: LazyLock<String> =
    LazyLock::new(|| env::var("GENERIC_CACHE_STORE_URL").unwrap_or_default());

/// Wrap a store into the shared handle used by the plugin
pub fn shared_store(store: impl CacheStore) -> SharedCacheStore {
    let store: Box<dyn CacheStore> = Box::new(store);
    Arc::new(Mutex::new(store))
}

/// Build the cache store selected by `GENERIC_CACHE_STORE_TYPE`
pub(crate) async fn cache_store_from_env() -> Result<SharedCacheStore, StorageError> {
    build_cache_store(
        GENERIC_CACHE_STORE_TYPE.as_str(),
        GENERIC_CACHE_STORE_URL.as_str(),
    )
    .await
}

async fn build_cache_store(
    store_type: &str,
    store_url: &str,
) -> Result<SharedCacheStore, StorageError> {
    tracing::info!("Initializing cache store with type: {}", store_type);

    let store: Box<dyn CacheStore> = match store_type {
        "memory" => Box::new(InMemoryCacheStore::new()),
        "redis" => {
            let client = redis::Client::open(store_url).map_err(|e| {
                tracing::error!("Failed to create Redis client: {}", e);
                StorageError::from(e)
            })?;
            let store = RedisCacheStore::new(client);
            // Verify the Redis server is reachable before handing out the store
            store.init().await.map_err(|e| {
                tracing::error!("Failed to connect to Redis: {}", e);
                e
            })?;
            Box::new(store)
        }
        t => return Err(StorageError::UnsupportedType(t.to_string())),
    };

    tracing::info!("Connected to cache store: type={}", store_type);

    Ok(Arc::new(Mutex::new(store)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_memory_store() {
        let store = build_cache_store("memory", "").await;
        assert!(store.is_ok());
    }

    #[tokio::test]
    async fn test_unsupported_store_type() {
        let result = build_cache_store("memcached", "").await;
        match result {
            Err(StorageError::UnsupportedType(t)) => assert_eq!(t, "memcached"),
            _ => panic!("Expected UnsupportedType error"),
        }
    }

    #[tokio::test]
    async fn test_invalid_redis_url() {
        let result = build_cache_store("redis", "not a url").await;
        assert!(matches!(result, Err(StorageError::Backend(_))));
    }
}
