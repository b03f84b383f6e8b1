use http::HeaderMap;

use crate::config::PluginConfig;
use crate::cookie::signed_cookie_header;
use crate::credentials::{CredentialSource, Credentials};
use crate::provider::{ConsumerSession, OpenIdConsumer};
use crate::secret::Secret;
use crate::storage::SharedCacheStore;

use super::types::Authentication;

/// Resolve a credential mapping to an identity.
///
/// Cookie credentials were verified during extraction and are trusted as they are.
/// Server credentials are handed to the provider; only a successful completion yields an
/// identity, together with a newly signed cookie for it.
pub(crate) async fn authenticate_credentials(
    config: &PluginConfig,
    secret: &Secret,
    consumer: &dyn OpenIdConsumer,
    store: &SharedCacheStore,
    creds: &Credentials,
) -> Option<Authentication> {
    match creds.source()? {
        CredentialSource::Cookie => {
            let identity = creds.identity().filter(|id| !id.is_empty())?;
            Some(Authentication::new(identity, HeaderMap::new()))
        }
        CredentialSource::Server => {
            complete_with_provider(config, secret, consumer, store, creds).await
        }
    }
}

async fn complete_with_provider(
    config: &PluginConfig,
    secret: &Secret,
    consumer: &dyn OpenIdConsumer,
    store: &SharedCacheStore,
    creds: &Credentials,
) -> Option<Authentication> {
    let mut session = ConsumerSession::new(store.clone(), config.handshake_ttl);
    let completion = consumer.complete(&mut session, creds).await;

    if let Err(e) = session.commit().await {
        tracing::error!("Failed to save consumer session: {}", e);
    }

    if !completion.is_success() {
        tracing::info!(
            "OpenId Authentication for {} failed: {}",
            completion.identity,
            completion.message
        );
        return None;
    }

    let headers = match signed_cookie_header(secret, config, &completion.identity) {
        Ok(headers) => headers,
        Err(e) => {
            tracing::error!("Failed to issue identity cookie: {}", e);
            return None;
        }
    };

    tracing::debug!("Authenticated {} with the provider", completion.identity);
    Some(Authentication::new(&completion.identity, headers))
}
