//! Password digests.
//!
//! Unsalted SHA-256 digests, hex-encoded, compared in constant time.
//! Hardened password storage is outside this platform's scope.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Hashes a password for storage.
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

/// Verifies a password against a stored digest in constant time.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let computed = hash_password(password);
    computed.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}
