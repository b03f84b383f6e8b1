mod config;
mod memory;
mod redis;
mod types;

pub use config::shared_store;
pub use memory::InMemoryCacheStore;
pub use self::redis::RedisCacheStore;
pub use types::{CacheData, CacheStore, SharedCacheStore};

pub(crate) use config::cache_store_from_env;
