//! OpenID provider consumer: discovery, the redirect handshake and assertion checks

mod errors;
mod main;
mod session;
mod types;

pub use errors::ProviderError;
pub use main::HttpConsumer;
pub use session::ConsumerSession;
pub use types::{
    Completion, CompletionStatus, Handshake, HandshakeState, OpenIdConsumer,
};

#[cfg(test)]
pub(crate) use session::HANDSHAKE_PREFIX;
