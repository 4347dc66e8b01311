//! Salt generation and salted SHA-256 digests.
//!
//! The scheme is a single SHA-256 pass over `password ‖ salt` with no
//! iteration count. It is kept as-is so existing credential files remain
//! readable; moving to a KDF would change the on-disk format.

use crate::constants::SALT_BYTES;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Fresh salt: a 128-bit random integer from the OS CSPRNG, in decimal.
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    OsRng.fill_bytes(&mut bytes);
    u128::from_le_bytes(bytes).to_string()
}

/// SHA-256 of the UTF-8 bytes of `password` followed by `salt`.
pub fn salted_digest(password: &str, salt: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hasher.finalize().to_vec()
}

/// Constant-time equality over the full byte sequence.
pub fn digests_match(expected: &[u8], provided: &[u8]) -> bool {
    if expected.len() != provided.len() {
        return false;
    }
    expected.ct_eq(provided).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DIGEST_LEN;

    #[test]
    fn test_salt_is_decimal_and_fresh() {
        let a = generate_salt();
        let b = generate_salt();
        assert!(a.chars().all(|c| c.is_ascii_digit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_digest_is_sha256_of_concatenation() {
        let digest = salted_digest("pass", "word");
        assert_eq!(digest.len(), DIGEST_LEN);
        assert_eq!(digest, Sha256::digest(b"password").to_vec());
    }

    #[test]
    fn test_salt_changes_digest() {
        assert_ne!(salted_digest("secret", "1"), salted_digest("secret", "2"));
    }

    #[test]
    fn test_digests_match() {
        let d = salted_digest("secret", "1");
        assert!(digests_match(&d, &d.clone()));
        assert!(!digests_match(&d, &salted_digest("secret", "2")));
        assert!(!digests_match(&d, &d[..16]));
        assert!(!digests_match(&d, &[]));
    }
}
