use thiserror::Error;

use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum SecretError {
    #[error("Failed to generate secret: {0}")]
    Generation(String),

    #[error("Failed to decode secret: {0}")]
    Decode(String),

    #[error("Secret too short: {0} bytes, at least {1} required")]
    TooShort(usize, usize),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}
