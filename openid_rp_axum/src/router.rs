//! Login and logout endpoints

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use openid_rp::OpenIdPlugin;

use super::pages::{login, login_failed, logout};

/// Router for the OpenID login pages, meant to be nested under `OPENID_ROUTE_PREFIX`:
/// - `GET {OPENID_ROUTE_PREFIX}/login` renders the login form
/// - `POST {OPENID_ROUTE_PREFIX}/login` re-renders it when no provider could be reached
/// - `GET {OPENID_ROUTE_PREFIX}/logout` expires the identity cookie and redirects
///
/// The login form relies on `openid_middleware` to send the user to the provider, so the
/// middleware must wrap these routes as well.
pub fn openid_router(plugin: Arc<OpenIdPlugin>) -> Router {
    openid_router_no_trace(plugin).layer(
        TraceLayer::new_for_http()
            .make_span_with(
                DefaultMakeSpan::new()
                    .level(Level::INFO)
                    .include_headers(true),
            )
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as `openid_router()` without the HTTP tracing layer
pub fn openid_router_no_trace(plugin: Arc<OpenIdPlugin>) -> Router {
    Router::new()
        .route("/login", get(login).post(login_failed))
        .route("/logout", get(logout))
        .with_state(plugin)
}
