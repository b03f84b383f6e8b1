use thiserror::Error;

use crate::storage::StorageError;
use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    #[error("Failed to fetch from provider: {0}")]
    Fetch(String),

    #[error("Provider returned HTTP status {0}")]
    HttpStatus(u16),

    #[error("Discovery failed: {0}")]
    Discovery(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Assertion rejected: {0}")]
    Rejected(String),

    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Fetch(err.to_string())
    }
}

impl From<StorageError> for ProviderError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}
