use httpmock::prelude::*;

use crate::common::{
    RP_PAGE, cookie_value, plugin, provider, provider_return, query_of, start_login,
};
use openid_rp::{AuthRequest, Authentication, CredentialSource, Extraction, OpenIdPlugin};

async fn authenticate(plugin: &OpenIdPlugin, request: &AuthRequest) -> Option<Authentication> {
    match plugin.extract_credentials(request).await {
        Extraction::Credentials(creds) => plugin.authenticate_credentials(&creds).await,
        Extraction::Redirect(redirect) => panic!("Unexpected redirect to {}", redirect.url),
    }
}

#[tokio::test]
async fn test_login_roundtrip_issues_cookie() {
    // Given a provider that confirms assertions
    let server = provider().await;
    let check = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/op")
                .x_www_form_urlencoded_tuple("openid.mode", "check_authentication");
            then.status(200).body("mode:id_res\nis_valid:true\n");
        })
        .await;
    let plugin = plugin();
    let identity = server.url("/alice");

    // When the user logs in and the provider sends them back
    let redirect = start_login(&plugin, &identity).await;
    assert!(redirect.starts_with(&server.url("/op")));
    assert_eq!(query_of(&redirect)["openid.mode"], "checkid_setup");

    let back = provider_return(&redirect, "id_res");
    let auth = authenticate(&plugin, &back).await.unwrap();

    // Then the identity is verified with the provider and a cookie is issued
    assert_eq!(auth.user_id, identity);
    check.assert_async().await;

    // And the cookie alone authenticates the next request
    let next = AuthRequest::new(RP_PAGE).with_cookie("__ac", cookie_value(&auth.headers));
    let creds = match plugin.extract_credentials(&next).await {
        Extraction::Credentials(creds) => creds,
        Extraction::Redirect(_) => panic!("Unexpected redirect"),
    };
    assert_eq!(creds.source(), Some(CredentialSource::Cookie));
    let auth = plugin.authenticate_credentials(&creds).await.unwrap();
    assert_eq!(auth.user_id, identity);
    assert!(auth.headers.is_empty());
}

#[tokio::test]
async fn test_replayed_provider_redirect_is_rejected() {
    // Given a completed login
    let server = provider().await;
    let check = server
        .mock_async(|when, then| {
            when.method(POST).path("/op");
            then.status(200).body("is_valid:true\n");
        })
        .await;
    let plugin = plugin();
    let redirect = start_login(&plugin, &server.url("/alice")).await;
    let back = provider_return(&redirect, "id_res");
    assert!(authenticate(&plugin, &back).await.is_some());

    // When the same provider redirect is presented again
    let replay = authenticate(&plugin, &back).await;

    // Then it fails without asking the provider a second time
    assert!(replay.is_none());
    assert_eq!(check.hits_async().await, 1);
}

#[tokio::test]
async fn test_provider_denial_gives_no_identity() {
    let server = provider().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/op");
            then.status(200).body("is_valid:false\n");
        })
        .await;
    let plugin = plugin();

    let redirect = start_login(&plugin, &server.url("/alice")).await;
    let back = provider_return(&redirect, "id_res");

    assert!(authenticate(&plugin, &back).await.is_none());
}

#[tokio::test]
async fn test_cancelled_login_is_anonymous() {
    // Given a user who cancels at the provider
    let server = provider().await;
    let check = server
        .mock_async(|when, then| {
            when.method(POST).path("/op");
            then.status(200).body("is_valid:true\n");
        })
        .await;
    let plugin = plugin();
    let redirect = start_login(&plugin, &server.url("/alice")).await;

    // When the provider sends them back with mode=cancel
    let back = provider_return(&redirect, "cancel");
    let extraction = plugin.extract_credentials(&back).await;

    // Then there are no credentials and the provider is never contacted
    let creds = extraction.credentials().unwrap();
    assert!(creds.is_empty());
    assert!(plugin.authenticate_credentials(creds).await.is_none());
    assert_eq!(check.hits_async().await, 0);
}

#[tokio::test]
async fn test_unknown_identity_page_starts_no_login() {
    // Given an identifier whose page does not exist
    let server = MockServer::start_async().await;
    let plugin = plugin();
    let request =
        AuthRequest::new(RP_PAGE).with_form("__ac_identity_url", server.url("/nobody"));

    // When the login is submitted
    let extraction = plugin.extract_credentials(&request).await;

    // Then the request carries on with no credentials
    assert!(extraction.credentials().is_some_and(|c| c.is_empty()));
}
