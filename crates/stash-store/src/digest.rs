//! Content hashing using SHA-256
//!
//! The digest depends on the bytes alone, never on filename or source, and
//! renders as 64 lowercase hex characters.

use sha2::{Digest as _, Sha256};
use stash_core::error::StashError;
use std::fmt;

use crate::StoreResult;

/// Length of a rendered digest in hex characters
pub const DIGEST_HEX_LEN: usize = 64;

/// A SHA-256 content digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentDigest {
    bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a new ContentDigest from raw bytes
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Digest a byte slice
    pub fn of(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Self::new(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Convert digest to hexadecimal string
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a digest from its hexadecimal rendering
    pub fn from_hex(hex_str: &str) -> StoreResult<Self> {
        let invalid = |reason: String| StashError::ConfigValidation {
            field: "checksum".to_string(),
            reason,
        };

        if hex_str.len() != DIGEST_HEX_LEN {
            return Err(invalid(format!(
                "expected {} hex characters, got {}",
                DIGEST_HEX_LEN,
                hex_str.len()
            )));
        }

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(hex_str, &mut bytes)
            .map_err(|e| invalid(format!("invalid hex: {}", e)))?;
        Ok(Self { bytes })
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Compute the checksum string stored alongside content
pub fn digest(content: &[u8]) -> String {
    ContentDigest::of(content).to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            digest(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_digest_shape() {
        let hex = digest(b"hello world");
        assert_eq!(hex.len(), DIGEST_HEX_LEN);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_distinct_content() {
        assert_ne!(digest(b"hello"), digest(b"world"));
        assert_ne!(digest(b""), digest(b"\0"));
    }

    #[test]
    fn test_hex_round_trip() {
        let original = ContentDigest::of(b"hello");
        let restored = ContentDigest::from_hex(&original.to_hex()).unwrap();
        assert_eq!(original, restored);
        assert_eq!(original.to_string(), original.to_hex());
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(ContentDigest::from_hex("abcd").is_err());
        assert!(ContentDigest::from_hex(&"zz".repeat(32)).is_err());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use proptest::test_runner::Config as ProptestConfig;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]
        #[test]
        fn digest_is_deterministic(content in prop::collection::vec(any::<u8>(), 0..2048)) {
            let first = digest(&content);
            let second = digest(&content);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.len(), DIGEST_HEX_LEN);
            prop_assert_eq!(ContentDigest::from_hex(&first).unwrap(), ContentDigest::of(&content));
        }
    }
}
