use askama::Template;
use axum::{http::StatusCode, response::Html};
use openid_rp_axum::{AuthIdentity, OPENID_ROUTE_PREFIX};

#[derive(Template)]
#[template(path = "index.j2")]
struct IndexTemplate<'a> {
    message: &'a str,
    logged_in: bool,
    auth_route_prefix: &'a str,
}

#[derive(Template)]
#[template(path = "protected.j2")]
struct ProtectedTemplate<'a> {
    identity: AuthIdentity,
    auth_route_prefix: &'a str,
}

pub(crate) async fn index(
    identity: Option<AuthIdentity>,
) -> Result<Html<String>, (StatusCode, String)> {
    let message = match &identity {
        Some(identity) => format!("Hey {}!", identity.login),
        None => "Log in with your OpenID to see the protected page.".to_string(),
    };
    let template = IndexTemplate {
        message: &message,
        logged_in: identity.is_some(),
        auth_route_prefix: OPENID_ROUTE_PREFIX.as_str(),
    };
    let html = Html(
        template
            .render()
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?,
    );
    Ok(html)
}

pub(crate) async fn protected(
    identity: AuthIdentity,
) -> Result<Html<String>, (StatusCode, String)> {
    tracing::trace!("Protected page for {}", identity.id);
    let template = ProtectedTemplate {
        identity,
        auth_route_prefix: OPENID_ROUTE_PREFIX.as_str(),
    };
    let html = Html(
        template
            .render()
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?,
    );
    Ok(html)
}
