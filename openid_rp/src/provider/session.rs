use crate::storage::{CacheData, SharedCacheStore};

use super::errors::ProviderError;

/// Cache prefix for staged handshakes, keyed by nonce
pub(crate) const HANDSHAKE_PREFIX: &str = "openid_handshake";

/// Per-request view of the handshake store.
///
/// Writes are buffered by `stage` and only reach the store on `commit`, so the caller
/// controls when state becomes visible to the next request.
pub struct ConsumerSession {
    store: SharedCacheStore,
    ttl: u64,
    staged: Vec<(String, CacheData)>,
}

impl ConsumerSession {
    pub fn new(store: SharedCacheStore, ttl: u64) -> Self {
        Self {
            store,
            ttl,
            staged: Vec::new(),
        }
    }

    /// Seconds committed entries stay valid
    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    pub fn stage(&mut self, key: impl Into<String>, data: CacheData) {
        self.staged.push((key.into(), data));
    }

    pub fn has_staged(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Write all staged entries to the store
    pub async fn commit(&mut self) -> Result<(), ProviderError> {
        if self.staged.is_empty() {
            return Ok(());
        }

        let mut store = self.store.lock().await;
        for (key, data) in self.staged.drain(..) {
            store
                .put_with_ttl(HANDSHAKE_PREFIX, &key, data, self.ttl as usize)
                .await?;
        }
        tracing::debug!("Committed consumer session state");
        Ok(())
    }

    /// Remove a committed entry and return it. A second take of the same key sees nothing.
    pub async fn take(&self, key: &str) -> Result<Option<CacheData>, ProviderError> {
        Ok(self.store.lock().await.take(HANDSHAKE_PREFIX, key).await?)
    }
}
