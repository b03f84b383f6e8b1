use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use openid_rp::OpenIdPlugin;

use super::login::is_local;
use crate::error::IntoResponseError;

#[derive(Deserialize)]
pub(crate) struct RedirectQuery {
    redirect: Option<String>,
}

/// Expire the identity cookie and send the browser to `redirect`, or to `/`
pub(crate) async fn logout(
    State(plugin): State<Arc<OpenIdPlugin>>,
    Query(params): Query<RedirectQuery>,
) -> Result<Response, (StatusCode, String)> {
    let headers = plugin.expire_cookie_headers().into_response_error()?;

    let target = match params.redirect.as_deref() {
        Some(redirect) if is_local(redirect) => redirect,
        Some(redirect) => {
            tracing::debug!("Ignoring non-local logout redirect {}", redirect);
            "/"
        }
        None => "/",
    };

    Ok((headers, Redirect::to(target)).into_response())
}
