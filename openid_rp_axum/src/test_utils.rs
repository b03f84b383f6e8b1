//! Shared helpers for the handler and middleware tests

use async_trait::async_trait;
use axum::response::Response;
use http::header::SET_COOKIE;
use std::sync::Arc;
use url::Url;

use openid_rp::{
    Completion, ConsumerSession, Credentials, Handshake, InMemoryCacheStore, OpenIdConsumer,
    OpenIdPlugin, PluginConfig, ProviderError, Secret, encode, shared_store, sign,
};

/// Provider stand-in that never touches the network
pub(crate) enum TestConsumer {
    /// Starts handshakes and confirms every assertion
    Confirming,
    /// Starts handshakes and rejects every assertion
    Rejecting,
    /// Cannot be reached
    Unreachable,
}

struct TestHandshake {
    identity: String,
}

impl Handshake for TestHandshake {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn redirect_url(&self, _trust_root: &str, return_to: &str) -> Result<String, ProviderError> {
        let mut url = Url::parse("https://op.example.com/server")
            .map_err(|e| ProviderError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("openid.identity", &self.identity)
            .append_pair("openid.return_to", return_to);
        Ok(url.into())
    }
}

#[async_trait]
impl OpenIdConsumer for TestConsumer {
    async fn begin(
        &self,
        _session: &mut ConsumerSession,
        identity_url: &str,
    ) -> Result<Box<dyn Handshake>, ProviderError> {
        match self {
            TestConsumer::Unreachable => {
                Err(ProviderError::Fetch("connection refused".to_string()))
            }
            _ => Ok(Box::new(TestHandshake {
                identity: identity_url.to_string(),
            })),
        }
    }

    async fn complete(&self, _session: &mut ConsumerSession, creds: &Credentials) -> Completion {
        let identity = creds.identity().unwrap_or_default();
        match self {
            TestConsumer::Confirming => Completion::success(identity),
            _ => Completion::failure(identity, "is_valid:false"),
        }
    }
}

fn secret() -> Secret {
    Secret::from_bytes(&[7u8; 32]).unwrap()
}

pub(crate) fn plugin(consumer: TestConsumer) -> Arc<OpenIdPlugin> {
    let plugin = OpenIdPlugin::new(
        PluginConfig::default(),
        secret(),
        Arc::new(consumer),
        shared_store(InMemoryCacheStore::new()),
    )
    .unwrap();
    Arc::new(plugin)
}

/// Cookie value the test plugin issues for `identity`
pub(crate) fn cookie_for(identity: &str) -> String {
    encode(identity.as_bytes(), &sign(&secret(), identity.as_bytes()))
}

pub(crate) fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}
