// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Download, verify and persist a CA bundle

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::Method;
use tempfile::NamedTempFile;
use url::Url;

use super::checksum::{digests_match, parse_checksum, sha256_hex};
use super::{CertificateBundle, CertificateSource, ChecksumExpectation};
use crate::config::DEFAULT_CHECKSUM_SUFFIX;
use crate::error::{Error, ErrorContext, Result};
use crate::http::{Request, Transport};
use crate::logging::redact_url;

/// Fetches a PEM bundle through a [`Transport`].
///
/// A call makes at most two requests (bundle and checksum file) and at most
/// one write. A bundle that fails verification never reaches the disk.
#[derive(Clone)]
pub struct CertificateFetcher {
    transport: Arc<dyn Transport>,
    checksum_suffix: String,
    redact_url: bool,
    timeout: Option<Duration>,
}

impl CertificateFetcher {
    /// Create a fetcher using `transport` for downloads
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            checksum_suffix: DEFAULT_CHECKSUM_SUFFIX.to_string(),
            redact_url: true,
            timeout: None,
        }
    }

    /// Suffix appended to the bundle URL path to locate its checksum file
    pub fn checksum_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.checksum_suffix = suffix.into();
        self
    }

    /// Log only scheme and host of certificate URLs
    pub fn redact_url(mut self, redact: bool) -> Self {
        self.redact_url = redact;
        self
    }

    /// Per-download timeout
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Location of the checksum file published next to `url`
    pub fn checksum_url(&self, url: &Url) -> Url {
        let mut checksum = url.clone();
        let path = format!("{}{}", url.path(), self.checksum_suffix);
        checksum.set_path(&path);
        checksum
    }

    /// Make sure a bundle exists at `path`.
    ///
    /// An existing file is returned untouched unless `force` is set. A fresh
    /// download is checked against `expectation` before it replaces anything.
    pub async fn fetch(
        &self,
        url: &str,
        path: &Path,
        force: bool,
        expectation: &ChecksumExpectation,
    ) -> Result<CertificateBundle> {
        let parsed = Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "unsupported certificate URL scheme '{}'",
                parsed.scheme()
            )));
        }
        let shown = self.display_url(&parsed);

        if !force && path.is_file() {
            tracing::debug!(
                category = "Certificate",
                url = %shown,
                path = %path.display(),
                "using cached certificate bundle"
            );
            return Ok(CertificateBundle {
                url: url.to_string(),
                path: path.to_path_buf(),
                present: true,
                verified: false,
                source: CertificateSource::Cached,
                sha256: None,
            });
        }

        tracing::info!(
            category = "Certificate",
            url = %shown,
            force,
            "downloading certificate bundle"
        );
        let body = self.download(&parsed).await?;
        let actual = sha256_hex(&body);

        let verified = match expectation {
            ChecksumExpectation::Explicit(expected) => {
                self.verify(path, expected, &actual)?;
                true
            }
            ChecksumExpectation::FetchFromSource => {
                let checksum_url = self.checksum_url(&parsed);
                let listing = self.download(&checksum_url).await?;
                let expected = parse_checksum(&String::from_utf8_lossy(&listing))
                    .ok_or_else(|| {
                        Error::Checksum(format!(
                            "no SHA-256 digest in {}",
                            self.display_url(&checksum_url)
                        ))
                    })?;
                self.verify(path, &expected, &actual)?;
                true
            }
            ChecksumExpectation::Skip => {
                tracing::debug!(category = "Certificate", "checksum verification skipped");
                false
            }
        };

        persist(path, &body)?;
        tracing::info!(
            category = "Certificate",
            path = %path.display(),
            bytes = body.len(),
            verified,
            "certificate bundle saved"
        );

        Ok(CertificateBundle {
            url: url.to_string(),
            path: path.to_path_buf(),
            present: true,
            verified,
            source: CertificateSource::Downloaded,
            sha256: Some(actual),
        })
    }

    async fn download(&self, url: &Url) -> Result<Bytes> {
        let request = Request::new(Method::GET, url.as_str())?.timeout(self.timeout);
        let response = self
            .transport
            .execute(request)
            .await
            .with_url(url.as_str())?;

        if !response.is_success() {
            tracing::warn!(
                category = "Certificate",
                url = %self.display_url(url),
                status = response.status_code(),
                "certificate download failed"
            );
            return Err(Error::network(
                url.as_str(),
                Some(response.status_code()),
                response.reason(),
            ));
        }

        Ok(response.body)
    }

    fn verify(&self, path: &Path, expected: &str, actual: &str) -> Result<()> {
        if digests_match(expected, actual) {
            tracing::debug!(category = "Certificate", sha256 = %actual, "checksum verified");
            return Ok(());
        }

        tracing::error!(
            category = "Certificate",
            expected = %expected.trim(),
            actual = %actual,
            "certificate bundle checksum mismatch"
        );
        Err(Error::Integrity {
            path: path.to_path_buf(),
            expected: expected.trim().to_ascii_lowercase(),
            actual: actual.to_string(),
        })
    }

    fn display_url(&self, url: &Url) -> String {
        if self.redact_url {
            redact_url(url)
        } else {
            url.to_string()
        }
    }
}

/// Write `bytes` to a temp file next to `path`, then rename it into place
fn persist(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ReqwestTransport;
    use crate::tls::TlsContext;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path as url_path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BUNDLE: &[u8] = b"CERT-DATA";

    fn fetcher() -> CertificateFetcher {
        let transport = ReqwestTransport::new(&TlsContext::System, None).unwrap();
        CertificateFetcher::new(Arc::new(transport))
    }

    async fn serve_bundle(server: &MockServer, hits: u64) {
        Mock::given(method("GET"))
            .and(url_path("/cacert.pem"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(BUNDLE))
            .expect(hits)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_explicit_digest_persists() {
        let server = MockServer::start().await;
        serve_bundle(&server, 1).await;
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("cacert.pem");

        let expected = ChecksumExpectation::Explicit(sha256_hex(BUNDLE).to_uppercase());
        let bundle = fetcher()
            .fetch(&format!("{}/cacert.pem", server.uri()), &target, false, &expected)
            .await
            .unwrap();

        assert!(bundle.present);
        assert!(bundle.verified);
        assert_eq!(bundle.source, CertificateSource::Downloaded);
        assert_eq!(bundle.sha256.as_deref(), Some(sha256_hex(BUNDLE).as_str()));
        assert_eq!(fs::read(&target).unwrap(), BUNDLE);
    }

    #[tokio::test]
    async fn test_mismatch_keeps_previous_file() {
        let server = MockServer::start().await;
        serve_bundle(&server, 1).await;
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("cacert.pem");
        fs::write(&target, b"OLD").unwrap();

        let expected = ChecksumExpectation::Explicit(sha256_hex(b"something else"));
        let err = fetcher()
            .fetch(&format!("{}/cacert.pem", server.uri()), &target, true, &expected)
            .await
            .unwrap_err();

        match err {
            Error::Integrity { expected: e, actual, .. } => {
                assert_eq!(e, sha256_hex(b"something else"));
                assert_eq!(actual, sha256_hex(BUNDLE));
            }
            other => panic!("Expected Integrity, got {:?}", other),
        }
        assert_eq!(fs::read(&target).unwrap(), b"OLD");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_cached_bundle_skips_network() {
        let server = MockServer::start().await;
        serve_bundle(&server, 0).await;
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("cacert.pem");
        fs::write(&target, b"EXISTING").unwrap();

        let bundle = fetcher()
            .fetch(
                &format!("{}/cacert.pem", server.uri()),
                &target,
                false,
                &ChecksumExpectation::Explicit(sha256_hex(BUNDLE)),
            )
            .await
            .unwrap();

        assert!(bundle.is_cached());
        assert!(!bundle.verified);
        assert_eq!(fs::read(&target).unwrap(), b"EXISTING");
    }

    #[tokio::test]
    async fn test_force_refetches() {
        let server = MockServer::start().await;
        serve_bundle(&server, 1).await;
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("cacert.pem");
        fs::write(&target, b"STALE").unwrap();

        let bundle = fetcher()
            .fetch(
                &format!("{}/cacert.pem", server.uri()),
                &target,
                true,
                &ChecksumExpectation::Skip,
            )
            .await
            .unwrap();

        assert!(!bundle.verified);
        assert!(bundle.status().present);
        assert_eq!(fs::read(&target).unwrap(), BUNDLE);
    }

    #[tokio::test]
    async fn test_skip_creates_missing_directories() {
        let server = MockServer::start().await;
        serve_bundle(&server, 1).await;
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("certs").join("nested").join("cacert.pem");

        fetcher()
            .fetch(
                &format!("{}/cacert.pem", server.uri()),
                &target,
                false,
                &ChecksumExpectation::Skip,
            )
            .await
            .unwrap();

        assert_eq!(fs::read(&target).unwrap(), BUNDLE);
    }

    #[tokio::test]
    async fn test_checksum_from_source() {
        let server = MockServer::start().await;
        serve_bundle(&server, 1).await;
        Mock::given(method("GET"))
            .and(url_path("/cacert.pem.sha256"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("{}  cacert.pem\n", sha256_hex(BUNDLE))),
            )
            .expect(1)
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("cacert.pem");

        let bundle = fetcher()
            .fetch(
                &format!("{}/cacert.pem", server.uri()),
                &target,
                false,
                &ChecksumExpectation::FetchFromSource,
            )
            .await
            .unwrap();

        assert!(bundle.verified);
        assert!(target.is_file());
    }

    #[tokio::test]
    async fn test_unparsable_checksum_writes_nothing() {
        let server = MockServer::start().await;
        serve_bundle(&server, 1).await;
        Mock::given(method("GET"))
            .and(url_path("/cacert.pem.sha256"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>moved</html>"))
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("cacert.pem");

        let err = fetcher()
            .fetch(
                &format!("{}/cacert.pem", server.uri()),
                &target,
                false,
                &ChecksumExpectation::FetchFromSource,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Checksum(_)));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_missing_checksum_file_is_network_error() {
        let server = MockServer::start().await;
        serve_bundle(&server, 1).await;
        Mock::given(method("GET"))
            .and(url_path("/cacert.pem.sha256"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("cacert.pem");

        let err = fetcher()
            .fetch(
                &format!("{}/cacert.pem", server.uri()),
                &target,
                false,
                &ChecksumExpectation::FetchFromSource,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Network { .. }));
        assert_eq!(err.status_code(), Some(404));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_source_checksum_mismatch_keeps_previous_file() {
        let server = MockServer::start().await;
        serve_bundle(&server, 2).await;
        Mock::given(method("GET"))
            .and(url_path("/cacert.pem.sha256"))
            .respond_with(ResponseTemplate::new(200).set_body_string(sha256_hex(b"other")))
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("cacert.pem");
        fs::write(&target, b"OLD").unwrap();

        let err = fetcher()
            .fetch(
                &format!("{}/cacert.pem", server.uri()),
                &target,
                true,
                &ChecksumExpectation::FetchFromSource,
            )
            .await
            .unwrap_err();

        assert!(err.is_integrity());
        assert_eq!(fs::read(&target).unwrap(), b"OLD");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);

        let fresh = dir.path().join("fresh.pem");
        let err = fetcher()
            .fetch(
                &format!("{}/cacert.pem", server.uri()),
                &fresh,
                false,
                &ChecksumExpectation::FetchFromSource,
            )
            .await
            .unwrap_err();
        assert!(err.is_integrity());
        assert!(!fresh.exists());
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("cacert.pem");

        let err = fetcher()
            .fetch(
                &format!("http://127.0.0.1:{}/cacert.pem", port),
                &target,
                false,
                &ChecksumExpectation::Skip,
            )
            .await
            .unwrap_err();

        match err {
            Error::Network { status, url, .. } => {
                assert_eq!(status, None);
                assert!(url.ends_with("/cacert.pem"));
            }
            other => panic!("Expected Network, got {:?}", other),
        }
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_not_found_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("cacert.pem");

        let err = fetcher()
            .fetch(
                &format!("{}/cacert.pem", server.uri()),
                &target,
                false,
                &ChecksumExpectation::Skip,
            )
            .await
            .unwrap_err();

        assert!(err.is_network());
        assert_eq!(err.status_code(), Some(404));
        assert!(!target.exists());
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("cacert.pem");
        let fetcher = fetcher();
        let err = tokio_test::block_on(fetcher.fetch(
            "ftp://example.com/cacert.pem",
            &target,
            false,
            &ChecksumExpectation::Skip,
        ))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(!target.exists());
    }

    #[test]
    fn test_checksum_url_keeps_query() {
        let url = Url::parse("https://curl.se/ca/cacert.pem?v=2").unwrap();
        let checksum = fetcher().checksum_suffix(".sha256").checksum_url(&url);
        assert_eq!(checksum.as_str(), "https://curl.se/ca/cacert.pem.sha256?v=2");
    }
}
