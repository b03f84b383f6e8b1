use std::sync::LazyLock;

/// Base64url-encoded signing secret. When unset the plugin generates one at construction.
pub(crate) static OPENID_SECRET: LazyLock<Option<String>> =
    LazyLock::new(|| std::env::var("OPENID_SECRET").ok().filter(|s| !s.is_empty()));
