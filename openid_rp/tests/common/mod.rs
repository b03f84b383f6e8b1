use http::HeaderMap;
use http::header::SET_COOKIE;
use httpmock::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use openid_rp::{
    AuthRequest, Extraction, HttpConsumer, InMemoryCacheStore, OpenIdPlugin, PluginConfig,
    Secret, shared_store,
};

pub const RP_PAGE: &str = "http://rp.example.com/page";

/// Provider serving an identity page at `/alice` that names `/op` as its server
pub async fn provider() -> MockServer {
    let server = MockServer::start_async().await;
    let body = format!(
        r#"<html><head><link rel="openid.server" href="{}"></head></html>"#,
        server.url("/op")
    );
    server
        .mock_async(|when, then| {
            when.method(GET).path("/alice");
            then.status(200)
                .header("content-type", "text/html")
                .body(body);
        })
        .await;
    server
}

pub fn plugin() -> OpenIdPlugin {
    let consumer = HttpConsumer::new(Duration::from_secs(5)).unwrap();
    OpenIdPlugin::new(
        PluginConfig::default(),
        Secret::generate().unwrap(),
        Arc::new(consumer),
        shared_store(InMemoryCacheStore::new()),
    )
    .unwrap()
}

pub fn query_of(url: &str) -> HashMap<String, String> {
    Url::parse(url).unwrap().query_pairs().into_owned().collect()
}

/// Submit a login for `identity_url` and return the provider redirect URL
pub async fn start_login(plugin: &OpenIdPlugin, identity_url: &str) -> String {
    let request = AuthRequest::new(RP_PAGE).with_form("__ac_identity_url", identity_url);
    match plugin.extract_credentials(&request).await {
        Extraction::Redirect(redirect) => redirect.url,
        Extraction::Credentials(creds) => panic!("Expected a redirect, got {creds:?}"),
    }
}

/// The request the browser makes when the provider sends it back with `mode`
pub fn provider_return(provider_redirect: &str, mode: &str) -> AuthRequest {
    let sent = query_of(provider_redirect);
    let return_to = &sent["openid.return_to"];

    let mut request = AuthRequest::new(RP_PAGE);
    for (k, v) in query_of(return_to) {
        request = request.with_form(k, v);
    }
    request
        .with_form("openid.mode", mode)
        .with_form("openid.identity", sent["openid.identity"].as_str())
        .with_form("openid.return_to", return_to.as_str())
        .with_form("openid.assoc_handle", "handle-1")
        .with_form("openid.signed", "mode,identity,return_to")
        .with_form("openid.sig", "c2lnbmF0dXJl")
}

/// Cookie value from a `Set-Cookie` header built by the plugin
pub fn cookie_value(headers: &HeaderMap) -> String {
    let header = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
    let value = header.strip_prefix("__ac=\"").unwrap();
    value[..value.find('"').unwrap()].to_string()
}
