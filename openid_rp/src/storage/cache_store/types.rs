use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::storage::errors::StorageError;

/// Cache store handle shared between the plugin and its consumer sessions
pub type SharedCacheStore = Arc<Mutex<Box<dyn CacheStore>>>;

/// A stored entry. Callers serialize their own state into `value`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheData {
    pub value: String,
}

/// Expiring key/value storage. Keys are namespaced by `prefix`.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Check the backend is usable. Called once before the store is handed out.
    async fn init(&self) -> Result<(), StorageError>;

    /// Store `value`, replacing any previous entry, for `ttl` seconds
    async fn put_with_ttl(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: usize,
    ) -> Result<(), StorageError>;

    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError>;

    /// Read and delete in one step; of two concurrent takes at most one sees the entry
    async fn take(&mut self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError>;
}

/// `<namespace>:<prefix>:<key>`, the key layout shared by every backend
pub(super) fn namespaced_key(prefix: &str, key: &str) -> String {
    format!("openid:{prefix}:{key}")
}
