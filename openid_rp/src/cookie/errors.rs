use thiserror::Error;

use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum CookieError {
    /// The cookie value is not two base64 tokens separated by whitespace
    #[error("Malformed cookie: {0}")]
    MalformedCookie(String),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}
