use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

use crate::credentials::Credentials;
use crate::provider::{Completion, ConsumerSession, Handshake, OpenIdConsumer, ProviderError};
use crate::secret::Secret;
use crate::storage::{CacheData, InMemoryCacheStore, SharedCacheStore, shared_store};

pub(crate) fn test_secret() -> Secret {
    Secret::from_bytes(&[7u8; 32]).unwrap()
}

pub(crate) fn memory_store() -> SharedCacheStore {
    shared_store(InMemoryCacheStore::new())
}

pub(crate) fn query_of(url: &str) -> HashMap<String, String> {
    Url::parse(url).unwrap().query_pairs().into_owned().collect()
}

/// Consumer that never touches the network.
///
/// `begin` stages one entry under `NONCE` and points at `https://op.example.com/server`;
/// `complete` answers with the configured outcome for the mapping's identity.
pub(crate) struct MockConsumer {
    begin_error: Option<ProviderError>,
    failure: Option<String>,
    begun: Mutex<Vec<String>>,
    completed: Mutex<usize>,
}

impl MockConsumer {
    pub(crate) const NONCE: &'static str = "mock-nonce";

    fn with(begin_error: Option<ProviderError>, failure: Option<String>) -> Self {
        Self {
            begin_error,
            failure,
            begun: Mutex::new(Vec::new()),
            completed: Mutex::new(0),
        }
    }

    pub(crate) fn succeeding() -> Self {
        Self::with(None, None)
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self::with(None, Some(message.to_string()))
    }

    pub(crate) fn unreachable() -> Self {
        Self::with(
            Some(ProviderError::Fetch("connection refused".to_string())),
            None,
        )
    }

    pub(crate) fn begun(&self) -> Vec<String> {
        self.begun.lock().unwrap().clone()
    }

    pub(crate) fn completed(&self) -> usize {
        *self.completed.lock().unwrap()
    }
}

#[async_trait]
impl OpenIdConsumer for MockConsumer {
    async fn begin(
        &self,
        session: &mut ConsumerSession,
        identity_url: &str,
    ) -> Result<Box<dyn Handshake>, ProviderError> {
        self.begun.lock().unwrap().push(identity_url.to_string());
        if let Some(e) = &self.begin_error {
            return Err(e.clone());
        }
        session.stage(
            Self::NONCE,
            CacheData {
                value: identity_url.to_string(),
            },
        );
        Ok(Box::new(MockHandshake {
            identity: identity_url.to_string(),
        }))
    }

    async fn complete(&self, _session: &mut ConsumerSession, creds: &Credentials) -> Completion {
        *self.completed.lock().unwrap() += 1;
        let identity = creds.identity().unwrap_or_default();
        match &self.failure {
            Some(message) => Completion::failure(identity, message.as_str()),
            None => Completion::success(identity),
        }
    }
}

struct MockHandshake {
    identity: String,
}

impl Handshake for MockHandshake {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn redirect_url(&self, trust_root: &str, return_to: &str) -> Result<String, ProviderError> {
        let mut url = Url::parse("https://op.example.com/server")
            .map_err(|e| ProviderError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("openid.mode", "checkid_setup")
            .append_pair("openid.identity", &self.identity)
            .append_pair("openid.return_to", return_to)
            .append_pair("openid.trust_root", trust_root);
        Ok(url.into())
    }
}
