//! Password digests: deterministic SHA-256, rendered as lowercase hex.
//!
//! No per-user salt, so equal passwords produce equal stored digests. The
//! digest format is fixed; changing it invalidates every stored credential.

use sha2::{Digest, Sha256};

/// Hash a plaintext password for storage.
pub fn hash_password(plaintext: &str) -> String {
    let digest = Sha256::digest(plaintext.as_bytes());
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Re-hash the candidate and compare against the stored digest.
pub fn verify_password(candidate: &str, stored: &str) -> bool {
    hash_password(candidate) == stored
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};

    #[test]
    fn test_deterministic() {
        assert_eq!(hash_password("hunter2"), hash_password("hunter2"));
    }

    #[test]
    fn test_distinct_inputs_distinct_digests() {
        assert_ne!(hash_password("hunter2"), hash_password("hunter3"));
        assert_ne!(hash_password(""), hash_password(" "));
    }

    #[test]
    fn test_known_vectors() {
        // SHA-256("password"), lowercase hex
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
        // SHA-256 of the empty string
        assert_eq!(
            hash_password(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_verify_roundtrip() {
        let stored = hash_password("correct horse battery staple");
        assert!(verify_password("correct horse battery staple", &stored));
        assert!(!verify_password("correct horse battery stapl", &stored));
    }
}
