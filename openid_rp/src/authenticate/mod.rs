mod main;
mod types;

pub use types::Authentication;

pub(crate) use main::authenticate_credentials;
