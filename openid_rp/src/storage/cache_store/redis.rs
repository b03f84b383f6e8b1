use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};

use crate::storage::errors::StorageError;

use super::types::{CacheData, CacheStore, namespaced_key};

/// Store backed by a Redis server, shared by every instance of a deployment
pub struct RedisCacheStore {
    client: redis::Client,
}

impl RedisCacheStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    async fn connection(&self) -> Result<MultiplexedConnection, StorageError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

fn parse_entry(raw: Option<String>) -> Result<Option<CacheData>, StorageError> {
    raw.map(|v| serde_json::from_str(&v))
        .transpose()
        .map_err(StorageError::from)
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn init(&self) -> Result<(), StorageError> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn put_with_ttl(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: usize,
    ) -> Result<(), StorageError> {
        let key = namespaced_key(prefix, key);
        let value = serde_json::to_string(&value)?;
        // SET EX rejects a zero expiry
        let ttl = ttl.max(1) as u64;

        let mut conn = self.connection().await?;
        let _: () = conn.set_ex(&key, value, ttl).await?;
        Ok(())
    }

    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        let key = namespaced_key(prefix, key);
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(&key).await?;
        parse_entry(raw)
    }

    async fn take(&mut self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        let key = namespaced_key(prefix, key);
        let mut conn = self.connection().await?;
        // GETDEL reads and deletes atomically
        let raw: Option<String> = conn.get_del(&key).await?;
        parse_entry(raw)
    }
}
