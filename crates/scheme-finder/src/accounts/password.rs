//! Salted one-way password hashing for the credential store.
//!
//! Stored form is `v1$<salt hex>$<sha256 hex>`; verification recomputes the
//! digest under the stored salt and never decodes anything. A malformed
//! stored value simply never verifies.

use rand::RngCore;
use sha2::{Digest, Sha256};

const SCHEME: &str = "v1";
const SALT_LEN: usize = 16;

/// Hash `password` under a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    let salt_hex = hex(&salt);
    let digest = digest_hex(&salt_hex, password);
    format!("{SCHEME}${salt_hex}${digest}")
}

/// Check `candidate` against a stored hash.
pub fn verify_password(candidate: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(salt_hex), Some(digest)) if scheme == SCHEME => {
            digest == digest_hex(salt_hex, candidate)
        }
        _ => false,
    }
}

fn digest_hex(salt_hex: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}
