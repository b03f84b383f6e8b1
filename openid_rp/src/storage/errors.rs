use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum StorageError {
    /// The backend could not be reached or refused a command
    #[error("Cache backend error: {0}")]
    Backend(String),

    /// A stored entry could not be encoded or decoded
    #[error("Cache entry encoding error: {0}")]
    Encoding(String),

    #[error("Unsupported cache store type: {0}")]
    UnsupportedType(String),
}

impl From<redis::RedisError> for StorageError {
    fn from(err: redis::RedisError) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}
