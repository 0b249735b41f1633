// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! CA bundle acquisition and integrity verification
//!
//! A bundle is downloaded, optionally checked against a SHA-256 digest and
//! only then written to disk in a single rename.

mod checksum;
mod fetcher;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use checksum::{digests_match, parse_checksum, sha256_hex};
pub use fetcher::CertificateFetcher;

/// How a freshly downloaded bundle is verified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ChecksumExpectation {
    /// Compare against this hex SHA-256 digest
    Explicit(String),
    /// Download the digest published next to the bundle
    FetchFromSource,
    /// Persist without verification
    #[default]
    Skip,
}

/// Where the bundle returned by a fetch came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertificateSource {
    /// Existing local file, no network access
    Cached,
    /// Downloaded by this call
    Downloaded,
}

/// A PEM trust store on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateBundle {
    /// Source URL
    pub url: String,
    /// Local path
    pub path: PathBuf,
    /// File exists at `path`
    pub present: bool,
    /// Digest was checked against an expectation in this call
    pub verified: bool,
    /// Cached or downloaded
    pub source: CertificateSource,
    /// Hex SHA-256 of the bytes written, when downloaded
    pub sha256: Option<String>,
}

/// Two-bit certificate state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CertificateStatus {
    pub present: bool,
    pub verified: bool,
}

impl CertificateBundle {
    /// Present/verified state
    pub fn status(&self) -> CertificateStatus {
        CertificateStatus {
            present: self.present,
            verified: self.verified,
        }
    }

    /// Check if the file came from the local cache
    pub fn is_cached(&self) -> bool {
        self.source == CertificateSource::Cached
    }
}
