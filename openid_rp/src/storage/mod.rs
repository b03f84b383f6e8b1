//! Short-lived key/value storage for handshake state, in memory or in Redis

mod cache_store;
mod errors;

pub use cache_store::{
    CacheData, CacheStore, InMemoryCacheStore, RedisCacheStore, SharedCacheStore, shared_store,
};
pub use errors::StorageError;

pub(crate) use cache_store::cache_store_from_env;
