use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::secret::Secret;

type HmacSha256 = Hmac<Sha256>;

/// Sign an identity with the deployment secret.
///
/// Deterministic for a given (secret, identity) pair.
pub fn sign(secret: &Secret, identity: &[u8]) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(identity);
    mac.finalize().into_bytes().to_vec()
}

/// Check a signature against the identity it claims to cover.
///
/// The comparison runs in constant time with respect to the signature content.
pub fn verify(secret: &Secret, identity: &[u8], signature: &[u8]) -> bool {
    sign(secret, identity).ct_eq(signature).into()
}
