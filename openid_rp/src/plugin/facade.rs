use http::HeaderMap;
use std::sync::Arc;

use crate::authenticate::{Authentication, authenticate_credentials};
use crate::challenge::{ChallengeRedirect, initiate_challenge};
use crate::config::PluginConfig;
use crate::cookie::{CookieError, expire_cookie_header, signed_cookie_header};
use crate::credentials::{AuthRequest, Credentials, Extraction, extract_credentials};
use crate::provider::{HttpConsumer, OpenIdConsumer};
use crate::secret::{OPENID_SECRET, Secret};
use crate::storage::{SharedCacheStore, cache_store_from_env};

use super::errors::PluginError;

/// An OpenID relying party: reads credentials from requests, starts provider logins and
/// resolves credentials to identities.
///
/// The plugin is immutable after construction and can be shared across requests behind
/// an `Arc`.
pub struct OpenIdPlugin {
    config: PluginConfig,
    secret: Secret,
    consumer: Arc<dyn OpenIdConsumer>,
    store: SharedCacheStore,
}

impl OpenIdPlugin {
    pub fn new(
        config: PluginConfig,
        secret: Secret,
        consumer: Arc<dyn OpenIdConsumer>,
        store: SharedCacheStore,
    ) -> Result<Self, PluginError> {
        validate_cookie_name(&config.cookie_name)?;
        Ok(Self {
            config,
            secret,
            consumer,
            store,
        })
    }

    /// Build a plugin from `OPENID_*` and `GENERIC_CACHE_STORE_*` environment variables
    /// with the HTTP consumer.
    pub async fn from_env() -> Result<Self, PluginError> {
        let config = PluginConfig::from_env();

        let secret = match OPENID_SECRET.as_deref() {
            Some(encoded) => Secret::from_base64url(encoded)?,
            None => {
                tracing::warn!(
                    "OPENID_SECRET is not set; generated a new secret. \
                    Identity cookies will not survive a restart."
                );
                Secret::generate()?
            }
        };

        let consumer = HttpConsumer::new(config.http_timeout)?;
        let store = cache_store_from_env().await?;

        Self::new(config, secret, Arc::new(consumer), store)
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Classify a request: a login redirect, or the credentials it carries
    #[tracing::instrument(skip_all)]
    pub async fn extract_credentials(&self, request: &AuthRequest) -> Extraction {
        extract_credentials(
            &self.config,
            &self.secret,
            self.consumer.as_ref(),
            &self.store,
            request,
        )
        .await
    }

    /// Resolve extracted credentials to an identity, or `None` when they do not prove one
    #[tracing::instrument(skip_all)]
    pub async fn authenticate_credentials(&self, creds: &Credentials) -> Option<Authentication> {
        authenticate_credentials(
            &self.config,
            &self.secret,
            self.consumer.as_ref(),
            &self.store,
            creds,
        )
        .await
    }

    /// Start a provider login for `identity_url` outside of credential extraction
    #[tracing::instrument(skip_all)]
    pub async fn initiate_challenge(
        &self,
        request: &AuthRequest,
        identity_url: &str,
        return_to: Option<&str>,
    ) -> Option<ChallengeRedirect> {
        initiate_challenge(
            &self.config,
            self.consumer.as_ref(),
            &self.store,
            request,
            identity_url,
            return_to,
        )
        .await
    }

    /// `Set-Cookie` header carrying a freshly signed cookie for `identity`
    pub fn signed_cookie_headers(&self, identity: &str) -> Result<HeaderMap, CookieError> {
        signed_cookie_header(&self.secret, &self.config, identity)
    }

    /// `Set-Cookie` header that removes the identity cookie from the browser
    pub fn expire_cookie_headers(&self) -> Result<HeaderMap, CookieError> {
        expire_cookie_header(&self.config)
    }
}

fn validate_cookie_name(name: &str) -> Result<(), PluginError> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b));
    if valid {
        Ok(())
    } else {
        Err(PluginError::Config(format!("invalid cookie name: {name:?}")))
    }
}
