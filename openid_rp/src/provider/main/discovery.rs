use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::provider::errors::ProviderError;

static LINK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<link\b[^>]*>").expect("link tag pattern is valid"));

static LINK_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\b(rel|href)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("link attribute pattern is valid")
});

/// Provider endpoints advertised by an identity page
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProviderLinks {
    pub(crate) server: String,
    pub(crate) delegate: Option<String>,
}

/// Turn user input into an identity URL. A missing scheme means `http://`.
pub(crate) fn normalize_identifier(input: &str) -> Result<Url, ProviderError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ProviderError::InvalidIdentity("empty identifier".to_string()));
    }

    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("http://{input}")
    };

    let url = Url::parse(&candidate)
        .map_err(|e| ProviderError::InvalidIdentity(format!("{input}: {e}")))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(ProviderError::InvalidIdentity(format!(
            "{input}: not an http(s) URL"
        ))),
    }
}

/// Find `openid.server` and `openid.delegate` links in an HTML page.
///
/// Relative hrefs are resolved against `base`. The first link of each kind wins.
pub(crate) fn parse_provider_links(html: &str, base: &Url) -> Result<ProviderLinks, ProviderError> {
    let mut server = None;
    let mut delegate = None;

    for tag in LINK_TAG.find_iter(html) {
        let mut rel = None;
        let mut href = None;
        for cap in LINK_ATTR.captures_iter(tag.as_str()) {
            let value = cap
                .get(2)
                .or_else(|| cap.get(3))
                .or_else(|| cap.get(4))
                .map(|m| m.as_str())
                .unwrap_or_default();
            match cap[1].to_ascii_lowercase().as_str() {
                "rel" => rel = Some(value),
                _ => href = Some(value),
            }
        }

        let (Some(rel), Some(href)) = (rel, href) else {
            continue;
        };

        for token in rel.split_ascii_whitespace() {
            let slot = if token.eq_ignore_ascii_case("openid.server") {
                &mut server
            } else if token.eq_ignore_ascii_case("openid.delegate") {
                &mut delegate
            } else {
                continue;
            };
            if slot.is_none() {
                *slot = Some(resolve_href(base, href)?);
            }
        }
    }

    let server = server.ok_or_else(|| {
        ProviderError::Discovery(format!("no openid.server link found at {base}"))
    })?;

    Ok(ProviderLinks { server, delegate })
}

fn resolve_href(base: &Url, href: &str) -> Result<String, ProviderError> {
    let href = unescape_html(href.trim());
    base.join(&href)
        .map(String::from)
        .map_err(|e| ProviderError::Discovery(format!("invalid link href {href}: {e}")))
}

fn unescape_html(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Fetch an identity page and read its provider links.
///
/// Returns the identity URL after redirects, which becomes the claimed identifier.
pub(crate) async fn discover(
    client: &reqwest::Client,
    identity: &Url,
) -> Result<(Url, ProviderLinks), ProviderError> {
    tracing::debug!("Discovering OpenID provider for {}", identity);

    let response = client
        .get(identity.as_str())
        .header(http::header::ACCEPT, "text/html, application/xhtml+xml")
        .send()
        .await?;

    if !response.status().is_success() {
        tracing::debug!(
            "Identity page {} answered with status {}",
            identity,
            response.status()
        );
        return Err(ProviderError::HttpStatus(response.status().as_u16()));
    }

    let claimed_id = response.url().clone();
    let body = response.text().await?;
    let links = parse_provider_links(&body, &claimed_id)?;

    tracing::debug!(
        "Discovered server {} (delegate: {:?}) for {}",
        links.server,
        links.delegate,
        claimed_id
    );

    Ok((claimed_id, links))
}
