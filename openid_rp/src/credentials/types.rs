use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::challenge::ChallengeRedirect;

pub const KEY_IDENTITY: &str = "openid.identity";
pub const KEY_SOURCE: &str = "openid.source";
pub const KEY_MODE: &str = "openid.mode";
pub const KEY_RETURN_TO: &str = "openid.return_to";
pub const KEY_NONCE: &str = "nonce";

/// Protocol fields copied from a positive assertion, without the `openid.` prefix
pub(crate) const ASSERTION_FIELDS: [&str; 7] = [
    "identity",
    "assoc_handle",
    "return_to",
    "signed",
    "sig",
    "invalidate_handle",
    "mode",
];

/// Where a credential mapping came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// A locally signed identity cookie, already verified
    Cookie,
    /// A provider redirect that still has to be verified with the provider
    Server,
}

impl CredentialSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialSource::Cookie => "cookie",
            CredentialSource::Server => "server",
        }
    }
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cookie" => Ok(CredentialSource::Cookie),
            "server" => Ok(CredentialSource::Server),
            other => Err(format!("Unknown credential source: {other}")),
        }
    }
}

/// Per-request credential mapping.
///
/// Keys are namespaced strings such as `openid.identity` or `nonce`. A mapping is cleared
/// and refilled whenever a credential source is recognized, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    entries: HashMap<String, String>,
    stale_cookie: bool,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping for an identity proven by a verified signed cookie
    pub fn from_cookie(identity: &str) -> Self {
        let mut creds = Self::new();
        creds.insert(KEY_IDENTITY, identity);
        creds.insert(KEY_SOURCE, CredentialSource::Cookie.as_str());
        creds
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn identity(&self) -> Option<&str> {
        self.get(KEY_IDENTITY)
    }

    /// Parsed `openid.source`. Unknown values count as no source.
    pub fn source(&self) -> Option<CredentialSource> {
        self.get(KEY_SOURCE).and_then(|s| s.parse().ok())
    }

    /// True when the request carried an identity cookie that failed decoding or
    /// verification. The mapping itself stays empty in that case.
    pub fn has_stale_cookie(&self) -> bool {
        self.stale_cookie
    }

    pub(crate) fn mark_stale_cookie(&mut self) {
        self.stale_cookie = true;
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Credentials {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut creds = Self::new();
        for (k, v) in iter {
            creds.insert(k, v);
        }
        creds
    }
}

/// Outcome of credential extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Normal outcome: a credential mapping, possibly empty
    Credentials(Credentials),
    /// The request asked for a new login. The handler must answer with this redirect
    /// instead of continuing.
    Redirect(ChallengeRedirect),
}

impl Extraction {
    /// Credential mapping of this outcome; a redirect carries none
    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            Extraction::Credentials(creds) => Some(creds),
            Extraction::Redirect(_) => None,
        }
    }
}
