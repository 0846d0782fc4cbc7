//! Identity Hashing
//!
//! Raw client identities (network addresses) are reduced to a SHA-256 hex
//! digest before they reach the window table.

use sha2::{Digest, Sha256};

/// Returns the lowercase hex SHA-256 digest of `identity`.
pub fn hash_identity(identity: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identity.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_sha256_hex() {
        assert_eq!(
            hash_identity("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hash_is_stable_and_distinct() {
        let a = hash_identity("10.0.0.1");
        assert_eq!(a, hash_identity("10.0.0.1"));
        assert_ne!(a, hash_identity("10.0.0.2"));
        assert_eq!(a.len(), 64);
        assert!(!a.contains("10.0.0.1"));
    }
}
