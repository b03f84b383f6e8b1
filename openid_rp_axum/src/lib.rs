//! openid_rp_axum - Axum integration for the openid_rp relying-party adapter
//!
//! Provides `openid_middleware`, which authenticates every request and sends login
//! requests to the OpenID provider, the `AuthIdentity` extractor, and `openid_router()`
//! with a login form and a logout endpoint.

mod config;
mod error;
mod identity;
mod middleware;
mod pages;
mod router;

#[cfg(test)]
mod test_utils;

pub use config::OPENID_REDIRECT_ANON;
pub use identity::{AuthIdentity, AuthRedirect};
pub use middleware::openid_middleware;
pub use router::{openid_router, openid_router_no_trace};

pub use openid_rp::OPENID_ROUTE_PREFIX;
