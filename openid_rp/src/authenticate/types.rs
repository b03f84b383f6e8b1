use http::HeaderMap;

/// A resolved identity
#[derive(Debug, Clone)]
pub struct Authentication {
    pub user_id: String,
    /// Login label. OpenID has no separate display name, so this equals `user_id`.
    pub login: String,
    /// Response headers to apply, such as a freshly signed identity cookie
    pub headers: HeaderMap,
}

impl Authentication {
    pub(crate) fn new(identity: &str, headers: HeaderMap) -> Self {
        Self {
            user_id: identity.to_string(),
            login: identity.to_string(),
            headers,
        }
    }
}
