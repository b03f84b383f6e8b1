use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::credentials::Credentials;
use crate::storage::CacheData;

use super::errors::ProviderError;
use super::session::ConsumerSession;

/// An OpenID consumer: discovers the provider for an identity and verifies the
/// assertions it sends back.
///
/// Durable state belongs in the `ConsumerSession`. Whatever `begin` stages there is
/// committed by the caller before the user is redirected.
#[async_trait]
pub trait OpenIdConsumer: Send + Sync {
    /// Start a handshake for a user-supplied identity.
    async fn begin(
        &self,
        session: &mut ConsumerSession,
        identity_url: &str,
    ) -> Result<Box<dyn Handshake>, ProviderError>;

    /// Verify a provider redirect. Failures are reported in the returned `Completion`.
    async fn complete(&self, session: &mut ConsumerSession, creds: &Credentials) -> Completion;
}

/// A started handshake, able to produce the URL that sends the user to the provider
pub trait Handshake: Send + Sync {
    /// The claimed identity this handshake authenticates
    fn identity(&self) -> &str;

    fn redirect_url(&self, trust_root: &str, return_to: &str) -> Result<String, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Success,
    Failure,
}

/// Result of verifying a provider redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub status: CompletionStatus,
    /// Identity the assertion was made for. Empty when not even that could be read.
    pub identity: String,
    /// Human readable reason on failure
    pub message: String,
}

impl Completion {
    pub fn success(identity: impl Into<String>) -> Self {
        Self {
            status: CompletionStatus::Success,
            identity: identity.into(),
            message: String::new(),
        }
    }

    pub fn failure(identity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: CompletionStatus::Failure,
            identity: identity.into(),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == CompletionStatus::Success
    }
}

/// What a consumer remembers between sending the user away and their return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandshakeState {
    pub claimed_id: String,
    pub server_url: String,
    pub delegate: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl HandshakeState {
    /// Identity sent to the provider: the delegate when there is one
    pub fn provider_identity(&self) -> &str {
        self.delegate.as_deref().unwrap_or(&self.claimed_id)
    }
}

impl TryFrom<HandshakeState> for CacheData {
    type Error = ProviderError;

    fn try_from(data: HandshakeState) -> Result<Self, Self::Error> {
        Ok(Self {
            value: serde_json::to_string(&data)
                .map_err(|e| ProviderError::Storage(e.to_string()))?,
        })
    }
}

impl TryFrom<CacheData> for HandshakeState {
    type Error = ProviderError;

    fn try_from(data: CacheData) -> Result<Self, Self::Error> {
        serde_json::from_str(&data.value).map_err(|e| ProviderError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(delegate: Option<&str>) -> HandshakeState {
        HandshakeState {
            claimed_id: "http://alice.example.com/".to_string(),
            server_url: "https://op.example.com/server".to_string(),
            delegate: delegate.map(str::to_string),
            expires_at: Utc::now(),
        }
    }

    #[test]
    fn test_handshake_state_through_cache_data() {
        let original = state(Some("https://op.example.com/u/alice"));

        let data = CacheData::try_from(original.clone()).unwrap();
        let restored = HandshakeState::try_from(data).unwrap();

        assert_eq!(restored, original);
    }

    #[test]
    fn test_corrupt_cache_data_is_storage_error() {
        let data = CacheData {
            value: "{not json".to_string(),
        };
        assert!(matches!(
            HandshakeState::try_from(data),
            Err(ProviderError::Storage(_))
        ));
    }

    #[test]
    fn test_provider_identity_prefers_delegate() {
        assert_eq!(
            state(Some("https://op.example.com/u/alice")).provider_identity(),
            "https://op.example.com/u/alice"
        );
        assert_eq!(state(None).provider_identity(), "http://alice.example.com/");
    }

    #[test]
    fn test_completion_constructors() {
        let ok = Completion::success("bob");
        assert!(ok.is_success());
        assert_eq!(ok.identity, "bob");

        let failed = Completion::failure("bob", "signature invalid");
        assert!(!failed.is_success());
        assert_eq!(failed.message, "signature invalid");
    }
}
