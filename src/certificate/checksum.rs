// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! SHA-256 digests of downloaded bundles

use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

lazy_static! {
    static ref SHA256_TOKEN: Regex = Regex::new(r"(?i)\b[0-9a-f]{64}\b").unwrap();
}

/// SHA-256 of `bytes` as lowercase hex
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Extract the digest from a checksum file body.
///
/// Accepts a bare digest or `sha256sum` output (`<hex>  <file>`); the first
/// 64-digit hex token wins.
pub fn parse_checksum(body: &str) -> Option<String> {
    SHA256_TOKEN
        .find(body)
        .map(|m| m.as_str().to_ascii_lowercase())
}

/// Case-insensitive digest comparison, ignoring surrounding whitespace
pub fn digests_match(expected: &str, actual: &str) -> bool {
    expected.trim().eq_ignore_ascii_case(actual.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_DIGEST: &str =
        "5c9bd6b1a1b3a8d2d1b0c1ac0f8a8cbbdc1f7c2a05f0f5a1d0bd8e2a4a1a9f3e";

    #[test]
    fn test_sha256_empty() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_known_content() {
        assert_eq!(
            sha256_hex(b"hello\n"),
            "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
        );
    }

    #[test]
    fn test_parse_sha256sum_line() {
        let body = format!("{}  cacert.pem\n", SAMPLE_DIGEST.to_uppercase());
        assert_eq!(parse_checksum(&body).as_deref(), Some(SAMPLE_DIGEST));
    }

    #[test]
    fn test_parse_bare_digest() {
        assert_eq!(
            parse_checksum(&format!("{}\n", SAMPLE_DIGEST)).as_deref(),
            Some(SAMPLE_DIGEST)
        );
    }

    #[test]
    fn test_parse_rejects_short_tokens() {
        assert_eq!(parse_checksum("deadbeef  cacert.pem"), None);
        assert_eq!(parse_checksum("<html>Not Found</html>"), None);
    }

    #[test]
    fn test_digests_match() {
        let actual = sha256_hex(b"CERT-DATA");
        assert!(digests_match(&actual.to_uppercase(), &actual));
        assert!(digests_match(&format!(" {}\n", actual), &actual));
        assert!(!digests_match(&sha256_hex(b"OTHER"), &actual));
    }
}
