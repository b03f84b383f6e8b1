//! Signed identity cookie: `<base64(identity)> <base64(HMAC(secret, identity))>`

mod errors;
mod main;

pub use errors::CookieError;
pub use main::{decode, encode, sign, verify};

pub(crate) use main::{expire_cookie_header, signed_cookie_header};
