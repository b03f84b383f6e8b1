use axum::{
    body::{Body, HttpBody, to_bytes},
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use http::{
    HeaderMap, Method,
    header::{CONTENT_LENGTH, CONTENT_TYPE},
    request::Parts,
};
use std::collections::HashMap;
use std::sync::Arc;

use openid_rp::{AuthRequest, Extraction, OpenIdPlugin};

use super::config::FORM_BODY_LIMIT;
use super::identity::AuthIdentity;

/// Run OpenID credential extraction and authentication for every request.
///
/// A login request is answered with a `303 See Other` to the provider. Otherwise the
/// handler runs; an authenticated identity is available to it as `AuthIdentity`, and any
/// cookie changes (a freshly signed cookie, expiry of a stale one) are added to its
/// response.
///
/// ```no_run
/// # async fn app(plugin: std::sync::Arc<openid_rp::OpenIdPlugin>) {
/// use axum::{Router, middleware::from_fn_with_state, routing::get};
/// use openid_rp_axum::openid_middleware;
///
/// let app: Router = Router::new()
///     .route("/", get(|| async { "Hello" }))
///     .layer(from_fn_with_state(plugin, openid_middleware));
/// # }
/// ```
pub async fn openid_middleware(
    State(plugin): State<Arc<OpenIdPlugin>>,
    req: Request,
    next: Next,
) -> Response {
    let (parts, body) = req.into_parts();
    let (form, body) = match read_form_body(&parts, body).await {
        Ok(read) => read,
        Err(response) => return response,
    };
    let auth_request = AuthRequest::from_parts(&parts, form);

    let creds = match plugin.extract_credentials(&auth_request).await {
        Extraction::Redirect(redirect) => {
            tracing::debug!("Sending {} to the provider", redirect.identity);
            return Redirect::to(&redirect.url).into_response();
        }
        Extraction::Credentials(creds) => creds,
    };

    let mut set_cookies = HeaderMap::new();
    if creds.has_stale_cookie() {
        match plugin.expire_cookie_headers() {
            Ok(headers) => append_headers(&mut set_cookies, &headers),
            Err(e) => tracing::error!("Failed to expire stale identity cookie: {}", e),
        }
    }

    let mut req = Request::from_parts(parts, body);
    if let Some(auth) = plugin.authenticate_credentials(&creds).await {
        append_headers(&mut set_cookies, &auth.headers);
        tracing::debug!("Request authenticated as {}", auth.user_id);
        req.extensions_mut().insert(AuthIdentity::from(auth));
    }

    let mut response = next.run(req).await;
    append_headers(response.headers_mut(), &set_cookies);
    response
}

fn append_headers(target: &mut HeaderMap, source: &HeaderMap) {
    for (name, value) in source {
        target.append(name.clone(), value.clone());
    }
}

fn is_form_post(parts: &Parts) -> bool {
    parts.method == Method::POST
        && parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"))
}

/// Declared body length, from the body itself or the `Content-Length` header
fn declared_length(parts: &Parts, body: &Body) -> Option<u64> {
    body.size_hint().exact().or_else(|| {
        parts
            .headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    })
}

/// Read urlencoded POST fields and hand back an equivalent body for the handler.
///
/// Bodies of unknown length or above `FORM_BODY_LIMIT` are left untouched for the
/// handler and contribute no credentials.
async fn read_form_body(
    parts: &Parts,
    body: Body,
) -> Result<(HashMap<String, String>, Body), Response> {
    if !is_form_post(parts) {
        return Ok((HashMap::new(), body));
    }

    match declared_length(parts, &body) {
        Some(length) if length <= FORM_BODY_LIMIT as u64 => {}
        length => {
            tracing::debug!("Not reading form body of length {:?} for credentials", length);
            return Ok((HashMap::new(), body));
        }
    }

    let bytes = to_bytes(body, FORM_BODY_LIMIT).await.map_err(|e| {
        tracing::debug!("Failed to read form body: {}", e);
        (StatusCode::BAD_REQUEST, "Unreadable form body").into_response()
    })?;
    let form = url::form_urlencoded::parse(&bytes).into_owned().collect();

    Ok((form, Body::from(bytes)))
}
