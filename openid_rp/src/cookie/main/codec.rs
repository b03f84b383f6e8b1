use base64::{
    Engine as _,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use http::HeaderMap;

use crate::config::PluginConfig;
use crate::cookie::errors::CookieError;
use crate::secret::Secret;
use crate::utils::header_set_cookie;

use super::signature::sign;

/// Standard alphabet, written without padding, read with or without it.
const COOKIE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode an identity and its signature into the cookie wire format
pub fn encode(identity: &[u8], signature: &[u8]) -> String {
    format!(
        "{} {}",
        COOKIE_ENGINE.encode(identity),
        COOKIE_ENGINE.encode(signature)
    )
}

/// Split a cookie value into its identity and signature bytes.
///
/// The value must hold exactly two base64 tokens separated by whitespace. Runs of
/// whitespace and surrounding whitespace are ignored. Anything else is
/// `CookieError::MalformedCookie`.
pub fn decode(value: &str) -> Result<(Vec<u8>, Vec<u8>), CookieError> {
    let tokens: Vec<&str> = value.split_ascii_whitespace().collect();
    let [identity, signature] = tokens.as_slice() else {
        return Err(CookieError::MalformedCookie(format!(
            "expected 2 tokens, found {}",
            tokens.len()
        )));
    };

    let identity = COOKIE_ENGINE
        .decode(identity)
        .map_err(|e| CookieError::MalformedCookie(format!("identity: {e}")))?;
    let signature = COOKIE_ENGINE
        .decode(signature)
        .map_err(|e| CookieError::MalformedCookie(format!("signature: {e}")))?;

    Ok((identity, signature))
}

/// Sign `identity` and return a `Set-Cookie` header carrying it
pub(crate) fn signed_cookie_header(
    secret: &Secret,
    config: &PluginConfig,
    identity: &str,
) -> Result<HeaderMap, CookieError> {
    let signature = sign(secret, identity.as_bytes());
    let value = encode(identity.as_bytes(), &signature);

    let mut headers = HeaderMap::new();
    header_set_cookie(
        &mut headers,
        &config.cookie_name,
        &value,
        config.cookie_max_age,
        config.cookie_secure,
    )?;
    Ok(headers)
}

/// Return a `Set-Cookie` header that removes the identity cookie
pub(crate) fn expire_cookie_header(config: &PluginConfig) -> Result<HeaderMap, CookieError> {
    let mut headers = HeaderMap::new();
    header_set_cookie(
        &mut headers,
        &config.cookie_name,
        "",
        Some(-86400),
        config.cookie_secure,
    )?;
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookie::main::signature::verify;
    use http::header::SET_COOKIE;
    use proptest::prelude::*;

    #[test]
    fn test_encode_has_no_padding_or_newlines() {
        // "a" would be "YQ==" with padding
        let value = encode(b"a", b"bc");
        assert_eq!(value, "YQ YmM");
    }

    #[test]
    fn test_decode_accepts_padded_tokens() {
        let (identity, signature) = decode("YQ== YmM=").unwrap();
        assert_eq!(identity, b"a");
        assert_eq!(signature, b"bc");
    }

    #[test]
    fn test_decode_rejects_three_tokens() {
        let result = decode("YQ YmM YQ");
        match result {
            Err(CookieError::MalformedCookie(msg)) => assert_eq!(msg, "expected 2 tokens, found 3"),
            other => panic!("Expected MalformedCookie, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_ignores_extra_whitespace() {
        // Given values with doubled, tabbed or trailing separators
        for value in ["YQ  YmM", "YQ\tYmM", "YQ YmM\n", " YQ YmM"] {
            // When decoding
            let (identity, signature) = decode(value).unwrap();

            // Then the two tokens are found
            assert_eq!(identity, b"a", "{value:?}");
            assert_eq!(signature, b"bc", "{value:?}");
        }
    }

    #[test]
    fn test_decode_rejects_empty_value() {
        match decode("   ") {
            Err(CookieError::MalformedCookie(msg)) => assert_eq!(msg, "expected 2 tokens, found 0"),
            other => panic!("Expected MalformedCookie, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_single_token() {
        assert!(matches!(
            decode("YWxpY2U"),
            Err(CookieError::MalformedCookie(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_base64() {
        assert!(matches!(
            decode("not*base64 YmM"),
            Err(CookieError::MalformedCookie(_))
        ));
        assert!(matches!(
            decode("YQ %%%"),
            Err(CookieError::MalformedCookie(_))
        ));
    }

    #[test]
    fn test_signed_cookie_header_verifies() {
        // Given a cookie issued for alice
        let secret = Secret::from_bytes(&[3u8; 32]).unwrap();
        let headers = signed_cookie_header(&secret, &PluginConfig::default(), "alice").unwrap();
        let set_cookie = headers.get(SET_COOKIE).unwrap().to_str().unwrap();

        // When reading the quoted value back
        let value = set_cookie
            .strip_prefix("__ac=\"")
            .and_then(|v| v.split('"').next())
            .unwrap();
        let (identity, signature) = decode(value).unwrap();

        // Then the identity and signature verify
        assert_eq!(identity, b"alice");
        assert!(verify(&secret, &identity, &signature));
    }

    #[test]
    fn test_expire_cookie_header() {
        let headers = expire_cookie_header(&PluginConfig::default()).unwrap();
        let set_cookie = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with("__ac=\"\";"));
        assert!(set_cookie.contains("; Secure"));
        assert!(set_cookie.contains("Max-Age=-86400"));
    }

    #[test]
    fn test_signed_cookie_header_follows_secure_setting() {
        // Given a plain-HTTP deployment
        let secret = Secret::from_bytes(&[3u8; 32]).unwrap();
        let config = PluginConfig::default().with_cookie_secure(false);

        // When issuing and expiring cookies
        let issued = signed_cookie_header(&secret, &config, "alice").unwrap();
        let expired = expire_cookie_header(&config).unwrap();

        // Then neither carries the Secure flag
        for headers in [issued, expired] {
            let set_cookie = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
            assert!(!set_cookie.contains("Secure"));
        }
    }

    proptest! {
        #[test]
        fn prop_decode_reverses_encode(
            identity in proptest::collection::vec(any::<u8>(), 0..96),
            signature in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let (i, s) = decode(&encode(&identity, &signature)).unwrap();
            prop_assert_eq!(i, identity);
            prop_assert_eq!(s, signature);
        }
    }
}
