//! Credential mapping and the request classifier that fills it

mod main;
mod request;
mod types;

pub use request::AuthRequest;
pub use types::{
    CredentialSource, Credentials, Extraction, KEY_IDENTITY, KEY_MODE, KEY_NONCE,
    KEY_RETURN_TO, KEY_SOURCE,
};

pub(crate) use main::extract_credentials;
