// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for secure-requests
//!
//! Every failure is returned to the caller of the operation that caused it.
//! Nothing here is retried or swallowed.

use std::path::PathBuf;

use thiserror::Error;

use crate::status::{StatusError, StatusKind};

/// Result type alias for secure-requests operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure from the underlying HTTP client
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Certificate (or checksum) download failed
    #[error("Network error fetching {url}: {reason}")]
    Network {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    /// Downloaded bundle does not match the expected digest
    #[error(
        "Integrity check failed for {}: expected {expected}, got {actual}",
        .path.display()
    )]
    Integrity {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// Checksum file could not be interpreted
    #[error("Checksum error: {0}")]
    Checksum(String),

    /// Request answered with a mapped error status
    #[error(transparent)]
    Status(#[from] StatusError),

    /// Trust store could not be loaded
    #[error("TLS error: {0}")]
    Tls(String),

    /// Cookie attribute could not be applied
    #[error("Cookie error: {0}")]
    Cookie(String),

    /// Method outside GET/POST/PUT/DELETE/PATCH
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a network error for a failed download
    pub fn network(url: impl Into<String>, status: Option<u16>, reason: impl Into<String>) -> Self {
        Error::Network {
            url: url.into(),
            status,
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a TLS error
    pub fn tls<S: Into<String>>(msg: S) -> Self {
        Error::Tls(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network { .. } | Error::Http(_))
    }

    /// Check if this is a checksum mismatch
    pub fn is_integrity(&self) -> bool {
        matches!(self, Error::Integrity { .. })
    }

    /// Check if this is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        self.status_code()
            .map_or(false, |s| (400..500).contains(&s))
    }

    /// Check if this is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status_code()
            .map_or(false, |s| (500..600).contains(&s))
    }

    /// Get HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Network { status, .. } => *status,
            Error::Status(err) => Some(err.code),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Get the status classification of a request failure
    pub fn status_kind(&self) -> Option<StatusKind> {
        match self {
            Error::Status(err) => Some(err.kind),
            _ => None,
        }
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Network { url, .. } => Some(url),
            Error::Status(err) => Some(&err.url),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Turn any failure into a network error for `url`
    fn with_url(self, url: &str) -> Result<T>;

    /// Add operation context to error
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn with_url(self, url: &str) -> Result<T> {
        self.map_err(|e| match e.into() {
            err @ Error::Network { .. } => err,
            other => Error::Network {
                url: url.to_string(),
                status: other.status_code(),
                reason: other.to_string(),
            },
        })
    }

    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            Error::Other(format!("{}: {}", msg, err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error() {
        let err = Error::network("https://curl.se/ca/cacert.pem", Some(404), "Not Found");

        assert!(err.is_network());
        assert!(err.is_client_error());
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.url(), Some("https://curl.se/ca/cacert.pem"));
    }

    #[test]
    fn test_integrity_error_message() {
        let err = Error::Integrity {
            path: PathBuf::from("cacert.pem"),
            expected: "aa".to_string(),
            actual: "bb".to_string(),
        };

        assert!(err.is_integrity());
        assert!(!err.is_network());
        assert_eq!(
            err.to_string(),
            "Integrity check failed for cacert.pem: expected aa, got bb"
        );
    }

    #[test]
    fn test_with_url_wraps_other_errors() {
        let res: std::result::Result<(), Error> = Err(Error::other("connection reset"));
        let err = res.with_url("https://example.com").unwrap_err();

        match err {
            Error::Network { url, status, reason } => {
                assert_eq!(url, "https://example.com");
                assert_eq!(status, None);
                assert_eq!(reason, "connection reset");
            }
            other => panic!("Expected Network, got {:?}", other),
        }
    }
}
