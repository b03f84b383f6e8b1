//! Central configuration for the openid_rp crate

use std::sync::LazyLock;
use std::time::Duration;

/// Route prefix for the openid_rp endpoints
///
/// Default: "/openid"
pub static OPENID_ROUTE_PREFIX: LazyLock<String> = LazyLock::new(|| {
    std::env::var("OPENID_ROUTE_PREFIX").unwrap_or_else(|_| "/openid".to_string())
});

/// Name of the signed identity cookie
///
/// Defaults to the host framework's main auth cookie name. Sharing the name with another
/// session cookie on the same site is a configuration hazard.
pub(crate) static OPENID_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("OPENID_COOKIE_NAME").unwrap_or_else(|_| DEFAULT_COOKIE_NAME.to_string())
});

/// Optional Max-Age of the signed identity cookie. Unset means a browser-session cookie.
pub(crate) static OPENID_COOKIE_MAX_AGE: LazyLock<Option<i64>> = LazyLock::new(|| {
    std::env::var("OPENID_COOKIE_MAX_AGE")
        .ok()
        .and_then(|s| s.parse().ok())
});

/// Whether the identity cookie carries the Secure attribute. Only "false" or "0" turn
/// it off, for plain-HTTP development setups.
pub(crate) static OPENID_COOKIE_SECURE: LazyLock<bool> =
    LazyLock::new(|| parse_flag(std::env::var("OPENID_COOKIE_SECURE").ok(), true));

pub(crate) static OPENID_TRUST_ROOT: LazyLock<String> =
    LazyLock::new(|| std::env::var("OPENID_TRUST_ROOT").unwrap_or_default());

pub(crate) static OPENID_LOGIN_PARAM: LazyLock<String> = LazyLock::new(|| {
    std::env::var("OPENID_LOGIN_PARAM").unwrap_or_else(|_| DEFAULT_LOGIN_PARAM.to_string())
});

/// Request parameter naming the page to return to after login
///
/// Default: "came_from"
pub static OPENID_CAME_FROM_PARAM: LazyLock<String> = LazyLock::new(|| {
    std::env::var("OPENID_CAME_FROM_PARAM")
        .unwrap_or_else(|_| DEFAULT_CAME_FROM_PARAM.to_string())
});

/// Seconds a staged handshake and its nonce stay valid
pub(crate) static OPENID_HANDSHAKE_TTL: LazyLock<u64> = LazyLock::new(|| {
    parse_or_default(
        std::env::var("OPENID_HANDSHAKE_TTL").ok(),
        DEFAULT_HANDSHAKE_TTL,
    )
});

/// Seconds allowed for each outbound call to a provider
pub(crate) static OPENID_HTTP_TIMEOUT: LazyLock<u64> = LazyLock::new(|| {
    parse_or_default(
        std::env::var("OPENID_HTTP_TIMEOUT").ok(),
        DEFAULT_HTTP_TIMEOUT,
    )
});

const DEFAULT_COOKIE_NAME: &str = "__ac";
const DEFAULT_LOGIN_PARAM: &str = "__ac_identity_url";
const DEFAULT_CAME_FROM_PARAM: &str = "came_from";
const DEFAULT_HANDSHAKE_TTL: u64 = 600;
const DEFAULT_HTTP_TIMEOUT: u64 = 30;

fn parse_or_default(value: Option<String>, default: u64) -> u64 {
    value.and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn parse_flag(value: Option<String>, default: bool) -> bool {
    match value.as_deref().map(str::trim) {
        Some("false") | Some("0") => false,
        Some("true") | Some("1") => true,
        _ => default,
    }
}

/// Settings of one OpenID plugin instance
#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Name of the signed identity cookie
    pub cookie_name: String,
    /// Max-Age attribute of the signed identity cookie, `None` for a session cookie
    pub cookie_max_age: Option<i64>,
    /// Send the identity cookie with the Secure attribute
    pub cookie_secure: bool,
    /// Trust root declared to the provider. Empty means the origin of the return target.
    pub trust_root: String,
    /// Request parameter that asks for a new login with the given identity
    pub login_param: String,
    /// Request parameter naming where the provider should send the user back
    pub came_from_param: String,
    /// Lifetime of a staged handshake in seconds
    pub handshake_ttl: u64,
    /// Timeout for provider HTTP calls
    pub http_timeout: Duration,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_max_age: None,
            cookie_secure: true,
            trust_root: String::new(),
            login_param: DEFAULT_LOGIN_PARAM.to_string(),
            came_from_param: DEFAULT_CAME_FROM_PARAM.to_string(),
            handshake_ttl: DEFAULT_HANDSHAKE_TTL,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT),
        }
    }
}

impl PluginConfig {
    /// Build the configuration from `OPENID_*` environment variables
    pub fn from_env() -> Self {
        Self {
            cookie_name: OPENID_COOKIE_NAME.clone(),
            cookie_max_age: *OPENID_COOKIE_MAX_AGE,
            cookie_secure: *OPENID_COOKIE_SECURE,
            trust_root: OPENID_TRUST_ROOT.clone(),
            login_param: OPENID_LOGIN_PARAM.clone(),
            came_from_param: OPENID_CAME_FROM_PARAM.clone(),
            handshake_ttl: *OPENID_HANDSHAKE_TTL,
            http_timeout: Duration::from_secs(*OPENID_HTTP_TIMEOUT),
        }
    }

    pub fn with_trust_root(mut self, trust_root: impl Into<String>) -> Self {
        self.trust_root = trust_root.into();
        self
    }

    pub fn with_cookie_name(mut self, cookie_name: impl Into<String>) -> Self {
        self.cookie_name = cookie_name.into();
        self
    }

    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }
}
