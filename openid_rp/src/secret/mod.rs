mod config;
mod errors;
mod types;

pub use errors::SecretError;
pub use types::Secret;

pub(crate) use config::OPENID_SECRET;
