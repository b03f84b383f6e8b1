use thiserror::Error;

use crate::provider::ProviderError;
use crate::secret::SecretError;
use crate::storage::StorageError;

/// Errors raised while constructing an `OpenIdPlugin`
#[derive(Debug, Error, Clone)]
pub enum PluginError {
    #[error("Secret error: {0}")]
    Secret(#[from] SecretError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Configuration error: {0}")]
    Config(String),
}
