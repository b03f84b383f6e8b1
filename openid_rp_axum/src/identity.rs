use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, OriginalUri},
    response::{IntoResponse, Redirect, Response},
};
use http::{Method, StatusCode, request::Parts};
use std::convert::Infallible;
use url::Url;

use openid_rp::{AuthRequest, Authentication, OPENID_CAME_FROM_PARAM};

use super::config::OPENID_REDIRECT_ANON;

/// Rejection of the `AuthIdentity` extractor
pub struct AuthRedirect {
    method: Method,
    came_from: String,
}

impl AuthRedirect {
    fn new(parts: &Parts) -> Self {
        let url = AuthRequest::from_parts(parts, Default::default()).url().to_string();
        // Inside a nested router the path has lost its prefix
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| &original.0)
            .unwrap_or(&parts.uri);
        let came_from = match Url::parse(&url) {
            Ok(mut url) => {
                url.set_path(uri.path());
                url.set_query(uri.query());
                url.into()
            }
            Err(_) => url,
        };
        Self {
            method: parts.method.clone(),
            came_from,
        }
    }

    fn location(&self) -> String {
        format!(
            "{}?{}={}",
            OPENID_REDIRECT_ANON.as_str(),
            OPENID_CAME_FROM_PARAM.as_str(),
            urlencoding::encode(&self.came_from)
        )
    }
}

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        if self.method == Method::GET {
            let location = self.location();
            tracing::debug!("Redirecting to {}", location);
            Redirect::temporary(&location).into_response()
        } else {
            tracing::debug!("Unauthorized");
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
    }
}

/// Identity authenticated by `openid_middleware`, available as an Axum extractor
///
/// Handlers taking `AuthIdentity` reject anonymous requests: GET requests are redirected
/// to the login page, everything else gets `401 Unauthorized`. Take
/// `Option<AuthIdentity>` to serve anonymous requests as well.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use openid_rp_axum::AuthIdentity;
///
/// async fn protected_handler(identity: AuthIdentity) -> String {
///     format!("Hello, {}!", identity.login)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected_handler));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthIdentity {
    /// Verified OpenID identifier
    pub id: String,
    /// Login label, the same identifier
    pub login: String,
}

impl From<Authentication> for AuthIdentity {
    fn from(auth: Authentication) -> Self {
        Self {
            id: auth.user_id,
            login: auth.login,
        }
    }
}

impl<S> FromRequestParts<S> for AuthIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthIdentity>()
            .cloned()
            .ok_or_else(|| AuthRedirect::new(parts))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthIdentity>().cloned())
    }
}
