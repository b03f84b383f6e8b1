use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use crate::credentials::{
    Credentials, KEY_IDENTITY, KEY_MODE, KEY_NONCE, KEY_RETURN_TO, KEY_SOURCE,
};
use crate::provider::errors::ProviderError;
use crate::provider::session::ConsumerSession;
use crate::provider::types::{Completion, Handshake, HandshakeState, OpenIdConsumer};
use crate::storage::CacheData;
use crate::utils::gen_random_string;

use super::discovery::{discover, normalize_identifier};
use super::kvform::parse_kvform;

/// OpenID 1.1 consumer in stateless mode.
///
/// Assertions are verified by asking the provider (`check_authentication`) rather than
/// through a shared association, so nothing but the handshake nonce is kept between
/// requests.
pub struct HttpConsumer {
    client: reqwest::Client,
}

impl HttpConsumer {
    /// Create a consumer whose outbound calls give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;
        Ok(Self { client })
    }

    async fn verify_assertion(
        &self,
        session: &ConsumerSession,
        creds: &Credentials,
    ) -> Result<String, ProviderError> {
        let nonce = creds
            .get(KEY_NONCE)
            .ok_or_else(|| ProviderError::MalformedResponse("missing nonce".to_string()))?;
        let identity = creds
            .identity()
            .ok_or_else(|| ProviderError::MalformedResponse("missing openid.identity".to_string()))?;

        let state: HandshakeState = session
            .take(nonce)
            .await?
            .ok_or_else(|| ProviderError::Rejected("unknown or already used nonce".to_string()))?
            .try_into()?;

        if state.expires_at <= Utc::now() {
            return Err(ProviderError::Rejected("handshake expired".to_string()));
        }

        if identity != state.provider_identity() {
            tracing::debug!(
                "Asserted identity {} differs from requested {}",
                identity,
                state.provider_identity()
            );
            return Err(ProviderError::Rejected(format!(
                "assertion is for {identity}, not {}",
                state.provider_identity()
            )));
        }

        verify_return_to(creds, nonce)?;
        verify_signed_fields(creds)?;

        let response = self.check_authentication(&state.server_url, creds).await?;

        if let Some(handle) = response.get("invalidate_handle") {
            tracing::info!("Provider invalidated association handle {}", handle);
        }

        match response.get("is_valid").map(String::as_str) {
            Some("true") => Ok(state.claimed_id),
            _ => Err(ProviderError::Rejected(
                "provider did not confirm the signature".to_string(),
            )),
        }
    }

    async fn check_authentication(
        &self,
        server_url: &str,
        creds: &Credentials,
    ) -> Result<HashMap<String, String>, ProviderError> {
        let mut params: Vec<(&str, &str)> = creds
            .iter()
            .filter(|(k, _)| k.starts_with("openid.") && *k != KEY_SOURCE && *k != KEY_MODE)
            .collect();
        params.push((KEY_MODE, "check_authentication"));

        tracing::debug!("Asking {} to check the assertion", server_url);

        let response = self.client.post(server_url).form(&params).send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::HttpStatus(response.status().as_u16()));
        }

        let body = response.text().await?;
        parse_kvform(&body)
    }
}

/// The return target the provider echoes back must carry the nonce we sent
fn verify_return_to(creds: &Credentials, nonce: &str) -> Result<(), ProviderError> {
    let return_to = creds
        .get(KEY_RETURN_TO)
        .ok_or_else(|| ProviderError::MalformedResponse("missing openid.return_to".to_string()))?;
    let return_to = Url::parse(return_to)
        .map_err(|e| ProviderError::MalformedResponse(format!("openid.return_to: {e}")))?;

    let echoed = return_to
        .query_pairs()
        .find(|(k, _)| k == KEY_NONCE)
        .map(|(_, v)| v.into_owned());

    match echoed {
        Some(echoed) if echoed == nonce => Ok(()),
        _ => Err(ProviderError::Rejected(
            "openid.return_to does not carry the handshake nonce".to_string(),
        )),
    }
}

/// The provider signature must cover the fields the verdict depends on
fn verify_signed_fields(creds: &Credentials) -> Result<(), ProviderError> {
    let signed = creds
        .get("openid.signed")
        .ok_or_else(|| ProviderError::MalformedResponse("missing openid.signed".to_string()))?;
    let fields: Vec<&str> = signed.split(',').map(str::trim).collect();

    for required in ["identity", "return_to"] {
        if !fields.contains(&required) {
            return Err(ProviderError::Rejected(format!(
                "openid.signed does not cover {required}"
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl OpenIdConsumer for HttpConsumer {
    async fn begin(
        &self,
        session: &mut ConsumerSession,
        identity_url: &str,
    ) -> Result<Box<dyn Handshake>, ProviderError> {
        let identity = normalize_identifier(identity_url)?;
        let (claimed_id, links) = discover(&self.client, &identity).await?;

        let nonce = gen_random_string(32)?;
        let state = HandshakeState {
            claimed_id: claimed_id.to_string(),
            server_url: links.server,
            delegate: links.delegate,
            expires_at: Utc::now() + ChronoDuration::seconds(session.ttl() as i64),
        };
        session.stage(nonce.clone(), CacheData::try_from(state.clone())?);

        Ok(Box::new(OpenIdHandshake { nonce, state }))
    }

    async fn complete(&self, session: &mut ConsumerSession, creds: &Credentials) -> Completion {
        let identity = creds.get(KEY_IDENTITY).unwrap_or_default();
        match self.verify_assertion(session, creds).await {
            Ok(claimed_id) => Completion::success(claimed_id),
            Err(e) => Completion::failure(identity, e.to_string()),
        }
    }
}

struct OpenIdHandshake {
    nonce: String,
    state: HandshakeState,
}

impl Handshake for OpenIdHandshake {
    fn identity(&self) -> &str {
        &self.state.claimed_id
    }

    fn redirect_url(&self, trust_root: &str, return_to: &str) -> Result<String, ProviderError> {
        let mut return_to = Url::parse(return_to)
            .map_err(|e| ProviderError::InvalidUrl(format!("return_to {return_to}: {e}")))?;
        return_to
            .query_pairs_mut()
            .append_pair(KEY_NONCE, &self.nonce);

        let trust_root = if trust_root.is_empty() {
            format!("{}/", return_to.origin().ascii_serialization())
        } else {
            trust_root.to_string()
        };

        let mut url = Url::parse(&self.state.server_url).map_err(|e| {
            ProviderError::InvalidUrl(format!("server {}: {e}", self.state.server_url))
        })?;
        url.query_pairs_mut()
            .append_pair(KEY_MODE, "checkid_setup")
            .append_pair(KEY_IDENTITY, self.state.provider_identity())
            .append_pair(KEY_RETURN_TO, return_to.as_str())
            .append_pair("openid.trust_root", &trust_root);

        Ok(url.into())
    }
}
