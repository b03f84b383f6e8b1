//! Central configuration for the openid_rp_axum crate

use std::sync::LazyLock;

use openid_rp::OPENID_ROUTE_PREFIX;

/// Where the `AuthIdentity` extractor sends unauthenticated GET requests
/// Default: "/openid/login"
pub static OPENID_REDIRECT_ANON: LazyLock<String> = LazyLock::new(|| {
    std::env::var("OPENID_REDIRECT_ANON")
        .unwrap_or_else(|_| format!("{}/login", *OPENID_ROUTE_PREFIX))
});

/// Largest urlencoded request body the middleware reads for credentials
pub(crate) const FORM_BODY_LIMIT: usize = 64 * 1024;
