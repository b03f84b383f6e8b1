use url::Url;

use crate::config::PluginConfig;
use crate::credentials::AuthRequest;
use crate::provider::{ConsumerSession, OpenIdConsumer};
use crate::storage::SharedCacheStore;

use super::types::ChallengeRedirect;

/// Start a login with the provider of `identity_url`.
///
/// The return target is `return_to` when given, else the `came_from` parameter, else the
/// current request URL. Returns `None` when the provider cannot be reached or the
/// handshake state cannot be saved; the request then simply carries on unauthenticated.
pub(crate) async fn initiate_challenge(
    config: &PluginConfig,
    consumer: &dyn OpenIdConsumer,
    store: &SharedCacheStore,
    request: &AuthRequest,
    identity_url: &str,
    return_to: Option<&str>,
) -> Option<ChallengeRedirect> {
    let mut session = ConsumerSession::new(store.clone(), config.handshake_ttl);

    let handshake = match consumer.begin(&mut session, identity_url).await {
        Ok(handshake) => handshake,
        Err(e) => {
            tracing::info!("openid consumer error for identity {}: {}", identity_url, e);
            return None;
        }
    };

    let return_to = return_to
        .or_else(|| request.form_param(&config.came_from_param))
        .unwrap_or_else(|| request.url());
    let return_to = absolute_url(request.url(), return_to);

    let url = match handshake.redirect_url(&config.trust_root, &return_to) {
        Ok(url) => url,
        Err(e) => {
            tracing::info!("openid consumer error for identity {}: {}", identity_url, e);
            return None;
        }
    };

    // State must be durable before the user leaves for the provider
    if let Err(e) = session.commit().await {
        tracing::error!("Failed to save handshake for {}: {}", identity_url, e);
        return None;
    }

    tracing::debug!("Redirecting {} to provider", handshake.identity());

    Some(ChallengeRedirect {
        url,
        identity: handshake.identity().to_string(),
    })
}

/// Resolve a possibly relative return target against the request URL
fn absolute_url(base: &str, target: &str) -> String {
    match Url::parse(base).and_then(|base| base.join(target)) {
        Ok(url) => url.into(),
        Err(_) => target.to_string(),
    }
}
