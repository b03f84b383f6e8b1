//! openid_rp - OpenID relying-party authentication adapter
//!
//! Turns an inbound HTTP request into an authenticated identity, either from an
//! HMAC-signed identity cookie or by verifying an OpenID provider's redirect with the
//! provider. Requests that ask for a login are answered with a redirect to the provider.

mod authenticate;
mod challenge;
mod config;
mod cookie;
mod credentials;
mod plugin;
mod provider;
mod secret;
mod storage;
mod utils;

#[cfg(test)]
mod test_utils;

pub use authenticate::Authentication;
pub use challenge::ChallengeRedirect;
pub use config::{OPENID_CAME_FROM_PARAM, OPENID_ROUTE_PREFIX, PluginConfig};
pub use cookie::{CookieError, decode, encode, sign, verify};
pub use credentials::{
    AuthRequest, CredentialSource, Credentials, Extraction, KEY_IDENTITY, KEY_MODE, KEY_NONCE,
    KEY_RETURN_TO, KEY_SOURCE,
};
pub use plugin::{OpenIdPlugin, PluginError};
pub use provider::{
    Completion, CompletionStatus, ConsumerSession, Handshake, HandshakeState, HttpConsumer,
    OpenIdConsumer, ProviderError,
};
pub use secret::{Secret, SecretError};
pub use storage::{
    CacheData, CacheStore, InMemoryCacheStore, RedisCacheStore, SharedCacheStore, StorageError,
    shared_store,
};
pub use utils::{UtilError, gen_random_string};
