use headers::{Cookie, HeaderMapExt};
use http::header::HOST;
use http::request::Parts;
use std::collections::HashMap;

use crate::utils::unquote_cookie_value;

/// The parts of an inbound request the extractor looks at: form parameters, cookies and
/// the request URL without its query string.
#[derive(Debug, Clone, Default)]
pub struct AuthRequest {
    form: HashMap<String, String>,
    cookies: HashMap<String, String>,
    url: String,
}

impl AuthRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_form(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(name.into(), value.into());
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Build from HTTP request parts.
    ///
    /// Query parameters are merged with `body_form`; body fields win on conflicts. The URL
    /// is made absolute from the `Host` header (and `X-Forwarded-Proto` when present) if the
    /// request URI is relative.
    pub fn from_parts(parts: &Parts, body_form: HashMap<String, String>) -> Self {
        let mut form: HashMap<String, String> = parts
            .uri
            .query()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        form.extend(body_form);

        let cookies = parts
            .headers
            .typed_get::<Cookie>()
            .map(|cookie| {
                cookie
                    .iter()
                    .map(|(k, v)| (k.to_string(), unquote_cookie_value(v).to_string()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            form,
            cookies,
            url: request_url(parts),
        }
    }

    pub fn form_param(&self, name: &str) -> Option<&str> {
        self.form.get(name).map(String::as_str)
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Request URL without query string
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn request_url(parts: &Parts) -> String {
    let path = parts.uri.path();
    if let (Some(scheme), Some(authority)) = (parts.uri.scheme_str(), parts.uri.authority()) {
        return format!("{scheme}://{authority}{path}");
    }

    let host = parts.headers.get(HOST).and_then(|h| h.to_str().ok());
    let scheme = parts
        .headers
        .get("X-Forwarded-Proto")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("http");

    match host {
        Some(host) => format!("{scheme}://{host}{path}"),
        None => path.to_string(),
    }
}
