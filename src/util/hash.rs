//! Stable identifiers derived from names.
//!
//! Identifiers are the first 16 bytes of the SHA-256 digest of the UTF-8
//! name, read in RFC 4122 field order. The same name gives the same
//! identifier on every run and every platform.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Derive a 128-bit identifier from arbitrary bytes.
pub fn identifier_for_bytes(data: &[u8]) -> Uuid {
    let digest = Sha256::digest(data);

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    Uuid::from_bytes(bytes)
}

/// Derive the identifier of a project, solution or filter from its name.
pub fn identifier_for(name: &str) -> Uuid {
    identifier_for_bytes(name.as_bytes())
}

/// `{xxxxxxxx-...}`, lowercase, as project files spell identifiers.
pub fn braced_lower(id: Uuid) -> String {
    format!("{{{}}}", id.hyphenated())
}

/// `XXXXXXXX-...`, uppercase, as solution and filters files spell identifiers.
pub fn upper(id: Uuid) -> String {
    format!("{:X}", id.hyphenated())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_is_sha256_prefix() {
        // sha256("hello") = 2cf24dba5fb0a30e26e83b2ac5b9e29e...
        assert_eq!(
            identifier_for("hello").hyphenated().to_string(),
            "2cf24dba-5fb0-a30e-26e8-3b2ac5b9e29e"
        );
    }

    #[test]
    fn test_identifier_is_stable() {
        assert_eq!(identifier_for("Core"), identifier_for("Core"));
    }

    #[test]
    fn test_identifier_is_case_sensitive() {
        assert_ne!(identifier_for("Core"), identifier_for("core"));
    }

    #[test]
    fn test_identifier_is_stable_across_threads() {
        let here = identifier_for("Core");
        let there = std::thread::spawn(|| identifier_for("Core")).join().unwrap();
        assert_eq!(here, there);
    }

    #[test]
    fn test_formatting() {
        let id = identifier_for("hello");
        assert_eq!(braced_lower(id), "{2cf24dba-5fb0-a30e-26e8-3b2ac5b9e29e}");
        assert_eq!(upper(id), "2CF24DBA-5FB0-A30E-26E8-3B2AC5B9E29E");
    }
}
