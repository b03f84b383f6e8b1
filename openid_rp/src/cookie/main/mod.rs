mod codec;
mod signature;

pub use codec::{decode, encode};
pub use signature::{sign, verify};

pub(crate) use codec::{expire_cookie_header, signed_cookie_header};
