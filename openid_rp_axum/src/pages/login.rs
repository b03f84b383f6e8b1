use askama::Template;
use axum::{
    Form,
    extract::{Query, State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::collections::HashMap;
use std::sync::Arc;

use openid_rp::{OPENID_ROUTE_PREFIX, OpenIdPlugin, PluginConfig};

use crate::error::IntoResponseError;
use crate::identity::AuthIdentity;

#[derive(Template)]
#[template(path = "login.j2", escape = "html")]
struct LoginTemplate<'a> {
    message: &'a str,
    action: &'a str,
    login_param: &'a str,
    came_from_param: &'a str,
    came_from: Option<&'a str>,
}

fn render(
    config: &PluginConfig,
    message: &str,
    came_from: Option<&str>,
) -> Result<Html<String>, (StatusCode, String)> {
    let action = format!("{}/login", OPENID_ROUTE_PREFIX.as_str());
    let template = LoginTemplate {
        message,
        action: &action,
        login_param: &config.login_param,
        came_from_param: &config.came_from_param,
        came_from,
    };
    Ok(Html(template.render().into_response_error()?))
}

/// Login form. The form posts the login parameter back here, where the middleware
/// turns it into a redirect to the provider.
pub(crate) async fn login(
    State(plugin): State<Arc<OpenIdPlugin>>,
    identity: Option<AuthIdentity>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, (StatusCode, String)> {
    let config = plugin.config();
    let came_from = params.get(&config.came_from_param).map(String::as_str);

    if let Some(identity) = identity {
        // Back from the provider, or already logged in
        let target = came_from.filter(|c| is_local(c)).unwrap_or("/");
        tracing::debug!("{} is logged in, redirecting to {}", identity.id, target);
        return Ok(Redirect::to(target).into_response());
    }

    Ok(render(config, "Log in with your OpenID", came_from)?.into_response())
}

/// A posted login form reaches the handler only when no provider redirect could be
/// started for the given identifier. The return target is kept from the posted form,
/// falling back to the query string.
pub(crate) async fn login_failed(
    State(plugin): State<Arc<OpenIdPlugin>>,
    identity: Option<AuthIdentity>,
    Query(params): Query<HashMap<String, String>>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Response, (StatusCode, String)> {
    if identity.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let config = plugin.config();
    let form = form.map(|Form(fields)| fields).unwrap_or_default();
    let came_from = form
        .get(&config.came_from_param)
        .or_else(|| params.get(&config.came_from_param))
        .map(String::as_str);
    let html = render(
        config,
        "Could not reach an OpenID provider for that identifier",
        came_from,
    )?;
    Ok((StatusCode::UNAUTHORIZED, html).into_response())
}

/// Absolute path on this site. Browsers read `/\host` as `//host` and drop tabs and
/// newlines from URLs, so backslashes and control characters never count as local.
pub(crate) fn is_local(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.chars().any(|c| c == '\\' || c.is_control())
}
