use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::storage::errors::StorageError;

use super::types::{CacheData, CacheStore, namespaced_key};

struct Entry {
    data: CacheData,
    expires_at: DateTime<Utc>,
}

impl Entry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Process-local store. Entries disappear with the process, so handshakes started
/// before a restart cannot be completed after it.
#[derive(Default)]
pub struct InMemoryCacheStore {
    entries: HashMap<String, Entry>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        tracing::info!("Creating in-memory cache store");
        Self::default()
    }

    fn sweep(&mut self, now: DateTime<Utc>) {
        self.entries.retain(|_, entry| entry.is_live(now));
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn put_with_ttl(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: usize,
    ) -> Result<(), StorageError> {
        let now = Utc::now();
        self.sweep(now);
        self.entries.insert(
            namespaced_key(prefix, key),
            Entry {
                data: value,
                expires_at: now + Duration::seconds(ttl as i64),
            },
        );
        Ok(())
    }

    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        let now = Utc::now();
        Ok(self
            .entries
            .get(&namespaced_key(prefix, key))
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.data.clone()))
    }

    async fn take(&mut self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        let now = Utc::now();
        Ok(self
            .entries
            .remove(&namespaced_key(prefix, key))
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(value: &str) -> CacheData {
        CacheData {
            value: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let mut store = InMemoryCacheStore::new();
        store
            .put_with_ttl("handshake", "n1", data("state"), 60)
            .await
            .unwrap();

        assert_eq!(
            store.get("handshake", "n1").await.unwrap(),
            Some(data("state"))
        );
        // get does not consume
        assert!(store.get("handshake", "n1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_zero_ttl_is_never_visible() {
        // Given an entry stored with no lifetime
        let mut store = InMemoryCacheStore::new();
        store
            .put_with_ttl("handshake", "n2", data("gone"), 0)
            .await
            .unwrap();

        // Then neither get nor take sees it
        assert_eq!(store.get("handshake", "n2").await.unwrap(), None);
        assert_eq!(store.take("handshake", "n2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_take_is_single_use() {
        let mut store = InMemoryCacheStore::new();
        store
            .put_with_ttl("handshake", "n3", data("once"), 60)
            .await
            .unwrap();

        assert_eq!(
            store.take("handshake", "n3").await.unwrap(),
            Some(data("once"))
        );
        assert_eq!(store.take("handshake", "n3").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_drops_expired_entries() {
        let mut store = InMemoryCacheStore::new();
        store
            .put_with_ttl("handshake", "old", data("expired"), 0)
            .await
            .unwrap();
        store
            .put_with_ttl("handshake", "new", data("fresh"), 60)
            .await
            .unwrap();

        assert_eq!(store.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_prefixes_do_not_collide() {
        let mut store = InMemoryCacheStore::new();
        store
            .put_with_ttl("a", "key", data("in a"), 60)
            .await
            .unwrap();

        assert_eq!(store.get("b", "key").await.unwrap(), None);
    }
}
