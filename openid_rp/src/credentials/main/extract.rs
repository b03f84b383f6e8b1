use crate::challenge::initiate_challenge;
use crate::config::PluginConfig;
use crate::cookie::{decode, verify};
use crate::credentials::request::AuthRequest;
use crate::credentials::types::{
    ASSERTION_FIELDS, CredentialSource, Credentials, Extraction, KEY_IDENTITY, KEY_MODE,
    KEY_NONCE, KEY_SOURCE,
};
use crate::provider::OpenIdConsumer;
use crate::secret::Secret;
use crate::storage::SharedCacheStore;

/// Classify a request and pull credentials out of it.
///
/// Precedence: an explicit login request starts a challenge; otherwise a provider
/// redirect (`openid.mode`) is read; only if that produced nothing is the signed cookie
/// consulted. A cancelled assertion counts as an answer and leaves the mapping empty.
pub(crate) async fn extract_credentials(
    config: &PluginConfig,
    secret: &Secret,
    consumer: &dyn OpenIdConsumer,
    store: &SharedCacheStore,
    request: &AuthRequest,
) -> Extraction {
    let mut creds = Credentials::new();

    if let Some(identity_url) = request.form_param(&config.login_param) {
        tracing::debug!("Explicit login requested for {}", identity_url);
        return match initiate_challenge(config, consumer, store, request, identity_url, None).await
        {
            Some(redirect) => Extraction::Redirect(redirect),
            None => Extraction::Credentials(creds),
        };
    }

    let answered = extract_server_response(request, &mut creds);
    if !answered {
        extract_cookie(secret, &config.cookie_name, request, &mut creds);
    }

    Extraction::Credentials(creds)
}

/// Read a provider redirect.
///
/// `id_res` is a positive assertion and refills `creds`. `cancel` is a negative assertion
/// and leaves `creds` untouched. Returns true when the provider answered with either.
pub(crate) fn extract_server_response(request: &AuthRequest, creds: &mut Credentials) -> bool {
    match request.form_param(KEY_MODE) {
        Some("id_res") => {
            creds.clear();
            creds.insert(KEY_SOURCE, CredentialSource::Server.as_str());
            if let Some(nonce) = request.form_param(KEY_NONCE) {
                creds.insert(KEY_NONCE, nonce);
            }
            for field in ASSERTION_FIELDS {
                let field = format!("openid.{field}");
                if let Some(value) = request.form_param(&field) {
                    creds.insert(field, value);
                }
            }
            true
        }
        Some("cancel") => {
            tracing::debug!("Provider returned a negative assertion");
            true
        }
        Some(mode) => {
            tracing::debug!("Ignoring unexpected openid.mode: {}", mode);
            false
        }
        None => false,
    }
}

/// Read the signed identity cookie.
///
/// A missing, malformed or badly signed cookie yields nothing. The last two mark the
/// mapping as carrying a stale cookie so the caller can expire it.
pub(crate) fn extract_cookie(
    secret: &Secret,
    cookie_name: &str,
    request: &AuthRequest,
    creds: &mut Credentials,
) {
    let Some(cookie) = request.cookie(cookie_name) else {
        return;
    };

    let (identity, signature) = match decode(cookie) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::debug!("Ignoring identity cookie: {}", e);
            creds.mark_stale_cookie();
            return;
        }
    };

    if !verify(secret, &identity, &signature) {
        tracing::debug!("Identity cookie signature mismatch");
        creds.mark_stale_cookie();
        return;
    }

    let identity = match String::from_utf8(identity) {
        Ok(identity) if !identity.is_empty() => identity,
        _ => {
            tracing::debug!("Identity cookie holds no usable identity");
            creds.mark_stale_cookie();
            return;
        }
    };

    creds.clear();
    creds.insert(KEY_IDENTITY, identity);
    creds.insert(KEY_SOURCE, CredentialSource::Cookie.as_str());
}
