// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # secure-requests - HTTP client with a verified trust store
//!
//! A thin layer over `reqwest` that keeps its own CA bundle. The bundle is
//! downloaded once, checked against a SHA-256 digest and only then written
//! to disk; the transport trusts nothing else.
//!
//! ## Features
//!
//! - Certificate fetch-and-verify: explicit digest, published checksum file, or none
//! - Pinned, system or (explicitly) unverified TLS contexts, TLS 1.2 minimum
//! - Typed errors for 4xx/5xx answers through a static status table
//! - Enum-keyed header and cookie helpers
//! - Browser-like default headers
//! - Request log with `[SAFE]/[UNSAFE]` and `[TLS]/[NO TLS]` tags
//!
//! ## Example
//!
//! ```rust,no_run
//! use secure_requests::{HeaderKey, SecureConfig, SecureRequests};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SecureConfig::default().certificate_verify_checksum(true);
//!     let client = SecureRequests::new(config).await?;
//!
//!     client.header_set(HeaderKey::Authorization, "Bearer token123")?;
//!     let response = client.get("https://example.com/api/data").await?;
//!     println!("{}", response.text_lossy());
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod certificate;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod status;
pub mod tls;

// Re-exports for convenience

// Facade
pub use client::{Clock, SecureRequests, SecureRequestsBuilder, SystemClock};

// Certificates
pub use certificate::{
    CertificateBundle, CertificateFetcher, CertificateSource, CertificateStatus,
    ChecksumExpectation,
};
pub use tls::TlsContext;

// Catalogs
pub use catalog::{CookieAttribute, CookieKey, HeaderKey};

// Configuration
pub use config::{EnvVars, SecureConfig};

// Errors
pub use error::{Error, ErrorContext, Result};
pub use status::{StatusError, StatusKind};

// HTTP
pub use http::{Cookie, CookieJar, Payload, ReqwestTransport, Request, Response, Transport};

// Logging
pub use logging::{init_logging, RequestRecord};

/// secure-requests version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
