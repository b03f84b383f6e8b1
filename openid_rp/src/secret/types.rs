use std::fmt;
use std::sync::Arc;

use crate::utils::{base64url_decode, base64url_encode, gen_random_bytes};

use super::errors::SecretError;

/// Length of a freshly generated secret
pub(crate) const SECRET_LEN: usize = 32;

/// Shortest secret accepted from configuration
pub(crate) const MIN_SECRET_LEN: usize = 16;

/// Per-deployment signing key for identity cookies.
///
/// Created once and never mutated. Generating a new one invalidates every cookie signed
/// with the old one, so a deployment should persist it (see `to_base64url`).
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Arc<[u8]>);

impl Secret {
    /// Generate a new random secret
    pub fn generate() -> Result<Self, SecretError> {
        let bytes =
            gen_random_bytes(SECRET_LEN).map_err(|e| SecretError::Generation(e.to_string()))?;
        Ok(Self(bytes.into()))
    }

    /// Wrap existing key material
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SecretError> {
        if bytes.len() < MIN_SECRET_LEN {
            return Err(SecretError::TooShort(bytes.len(), MIN_SECRET_LEN));
        }
        Ok(Self(bytes.into()))
    }

    /// Decode a secret persisted with `to_base64url`
    pub fn from_base64url(encoded: &str) -> Result<Self, SecretError> {
        let bytes =
            base64url_decode(encoded.trim()).map_err(|e| SecretError::Decode(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn to_base64url(&self) -> Result<String, SecretError> {
        Ok(base64url_encode(self.0.to_vec())?)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret([REDACTED; {}])", self.0.len())
    }
}
