// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request facade
//!
//! [`SecureRequests`] owns the trust context, default headers, cookie jar and
//! request log. Every request is logged and mapped through the status table
//! before it is returned.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};

use crate::catalog::{CookieAttribute, CookieKey, HeaderKey};
use crate::certificate::{CertificateBundle, CertificateFetcher, CertificateSource};
use crate::config::SecureConfig;
use crate::error::{Error, Result};
use crate::http::{
    default_headers, merge_headers, parse_method, Cookie, CookieJar, Payload, Request,
    ReqwestTransport, Response, Transport,
};
use crate::logging::RequestRecord;
use crate::tls::TlsContext;

/// Records kept by the in-memory request log
pub const REQUEST_LOG_CAPACITY: usize = 256;

/// Source of request timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Builder for [`SecureRequests`]
pub struct SecureRequestsBuilder {
    config: SecureConfig,
    transport: Option<Arc<dyn Transport>>,
    headers: HeaderMap,
    clock: Arc<dyn Clock>,
}

impl Default for SecureRequestsBuilder {
    fn default() -> Self {
        Self {
            config: SecureConfig::default(),
            transport: None,
            headers: HeaderMap::new(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl SecureRequestsBuilder {
    /// Use `config`
    pub fn config(mut self, config: SecureConfig) -> Self {
        self.config = config;
        self
    }

    /// Dispatch through `transport` instead of the TLS-configured default
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Custom headers laid over the generated defaults
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Timestamp source for request records
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Fetch the bundle if configured, then build the transport
    pub async fn build(self) -> Result<SecureRequests> {
        let config = self.config;
        config.validate()?;

        let certificate = if config.certificate_need_fetch {
            let bootstrap = match self.transport {
                Some(ref transport) => transport.clone(),
                None => bootstrap_transport(&config)?,
            };
            Some(fetch_certificate(&config, bootstrap, false).await?)
        } else {
            existing_bundle(&config)
        };

        let tls = TlsContext::from_config(
            &config,
            certificate.as_ref().map(|bundle| bundle.path.as_path()),
        )?;

        let custom_transport = self.transport.is_some();
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&tls, config.request_timeout())?),
        };

        Ok(SecureRequests {
            config: Arc::new(config),
            transport: Arc::new(RwLock::new(transport)),
            custom_transport,
            tls: Arc::new(RwLock::new(tls)),
            headers: Arc::new(RwLock::new(default_headers(&self.headers))),
            cookies: CookieJar::new(),
            certificate: Arc::new(RwLock::new(certificate)),
            log: Arc::new(RwLock::new(VecDeque::new())),
            clock: self.clock,
        })
    }
}

/// Transport for certificate downloads, before any bundle is trusted
fn bootstrap_transport(config: &SecureConfig) -> Result<Arc<dyn Transport>> {
    let tls = TlsContext::build(None, config.use_tls, config.unsafe_mode)?;
    Ok(Arc::new(ReqwestTransport::new(&tls, config.request_timeout())?))
}

async fn fetch_certificate(
    config: &SecureConfig,
    transport: Arc<dyn Transport>,
    force: bool,
) -> Result<CertificateBundle> {
    CertificateFetcher::new(transport)
        .checksum_suffix(config.checksum_suffix.clone())
        .redact_url(config.redact_certificate_url)
        .timeout(config.request_timeout())
        .fetch(
            &config.certificate_url,
            &config.certificate_path,
            force,
            &config.checksum_expectation(),
        )
        .await
}

fn existing_bundle(config: &SecureConfig) -> Option<CertificateBundle> {
    config.certificate_path.is_file().then(|| CertificateBundle {
        url: config.certificate_url.clone(),
        path: config.certificate_path.clone(),
        present: true,
        verified: false,
        source: CertificateSource::Cached,
        sha256: None,
    })
}

/// HTTP client with a pinned trust store and enum-keyed header/cookie helpers.
///
/// Clones share the transport, headers, cookie jar and request log.
#[derive(Clone)]
pub struct SecureRequests {
    config: Arc<SecureConfig>,
    transport: Arc<RwLock<Arc<dyn Transport>>>,
    custom_transport: bool,
    tls: Arc<RwLock<TlsContext>>,
    headers: Arc<RwLock<HeaderMap>>,
    cookies: CookieJar,
    certificate: Arc<RwLock<Option<CertificateBundle>>>,
    log: Arc<RwLock<VecDeque<RequestRecord>>>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for SecureRequests {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureRequests")
            .field("tls", &*self.tls.read())
            .field("custom_transport", &self.custom_transport)
            .field("headers", &self.headers.read().len())
            .field("cookies", &self.cookies.len())
            .finish()
    }
}

impl SecureRequests {
    /// Start a builder
    pub fn builder() -> SecureRequestsBuilder {
        SecureRequestsBuilder::default()
    }

    /// Build with `config` and defaults for everything else
    pub async fn new(config: SecureConfig) -> Result<Self> {
        Self::builder().config(config).build().await
    }

    /// Active configuration
    pub fn config(&self) -> &SecureConfig {
        &self.config
    }

    /// Current trust context
    pub fn tls_context(&self) -> TlsContext {
        self.tls.read().clone()
    }

    /// Bundle in use, if any
    pub fn certificate(&self) -> Option<CertificateBundle> {
        self.certificate.read().clone()
    }

    /// Re-download the bundle (force) and rebuild the transport around it
    pub async fn refresh_certificate(&self) -> Result<CertificateBundle> {
        let downloader = if self.custom_transport {
            self.transport.read().clone()
        } else {
            bootstrap_transport(&self.config)?
        };
        let bundle = fetch_certificate(&self.config, downloader, true).await?;

        let tls = TlsContext::from_config(&self.config, Some(&bundle.path))?;
        if !self.custom_transport {
            let transport = ReqwestTransport::new(&tls, self.config.request_timeout())?;
            *self.transport.write() = Arc::new(transport);
        }
        *self.tls.write() = tls;
        *self.certificate.write() = Some(bundle.clone());
        Ok(bundle)
    }

    /// Send a request.
    ///
    /// `method` is one of GET, POST, PUT, DELETE, PATCH (any case). `headers`
    /// override the instance headers for this call only. A 4xx/5xx answer is
    /// returned as [`Error::Status`].
    pub async fn request(
        &self,
        method: &str,
        url: &str,
        payload: Option<&Payload>,
        headers: Option<&HeaderMap>,
    ) -> Result<Response> {
        let method = parse_method(method)?;
        let mut request = Request::new(method.clone(), url)?.timeout(self.config.request_timeout());
        if let Some(payload) = payload {
            request = request.payload(payload)?;
        }

        let mut merged = self.headers.read().clone();
        merge_headers(&mut merged, &request.headers);
        if let Some(overrides) = headers {
            merge_headers(&mut merged, overrides);
        }
        if !merged.contains_key(COOKIE) {
            if let Some(cookie) = self.cookies.get_cookie_header(&request.url) {
                if let Ok(value) = HeaderValue::from_str(&cookie) {
                    merged.insert(COOKIE, value);
                }
            }
        }

        if self.config.log_extensive && !self.config.silent {
            tracing::debug!(
                category = "Request",
                method = %method,
                url = %request.url,
                headers = ?merged,
                payload_bytes = request.body_len(),
                "sending request"
            );
        }
        request.headers = merged;

        let target = request.url.clone();
        let transport = self.transport.read().clone();
        let response = match transport.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                if !self.config.silent {
                    tracing::error!(
                        category = "Request",
                        method = %method,
                        url = %target,
                        error = %err,
                        "request failed"
                    );
                }
                return Err(err);
            }
        };

        for set_cookie in response.set_cookies() {
            self.cookies.add_from_header(set_cookie, &response.url);
        }

        let (safe, tls) = {
            let context = self.tls.read();
            (context.is_safe(), context.uses_tls())
        };
        let record = RequestRecord::new(
            self.clock.now(),
            &method,
            &target,
            response.status_code(),
            response.reason(),
            safe,
            tls,
            response.response_time_ms,
        );
        if !self.config.silent {
            record.emit();
        }
        self.push_record(record);

        response.error_for_status()
    }

    /// GET `url`
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.request("GET", url, None, None).await
    }

    /// POST `payload` to `url`
    pub async fn post(&self, url: &str, payload: &Payload) -> Result<Response> {
        self.request("POST", url, Some(payload), None).await
    }

    fn push_record(&self, record: RequestRecord) {
        let mut log = self.log.write();
        if log.len() == REQUEST_LOG_CAPACITY {
            log.pop_front();
        }
        log.push_back(record);
    }

    /// Logged requests, oldest first
    pub fn request_log(&self) -> Vec<RequestRecord> {
        self.log.read().iter().cloned().collect()
    }

    // Headers

    /// Current instance headers
    pub fn headers(&self) -> HeaderMap {
        self.headers.read().clone()
    }

    /// Replace the instance headers with a freshly generated set
    pub fn header_generate(&self, custom: &HeaderMap) {
        *self.headers.write() = default_headers(custom);
    }

    /// Set one header
    pub fn header_set(&self, key: HeaderKey, value: &str) -> Result<()> {
        let value = header_value(key, value)?;
        self.headers.write().insert(key.header_name(), value);
        Ok(())
    }

    /// Value of one header
    pub fn header_get(&self, key: HeaderKey) -> Option<String> {
        self.headers
            .read()
            .get(key.header_name())
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// Remove one header, returning its old value
    pub fn header_remove(&self, key: HeaderKey) -> Option<String> {
        self.headers
            .write()
            .remove(key.header_name())
            .and_then(|v| v.to_str().ok().map(str::to_string))
    }

    /// Set several headers; nothing changes if any value is invalid
    pub fn header_update_multiple<I, V>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (HeaderKey, V)>,
        V: AsRef<str>,
    {
        let parsed = entries
            .into_iter()
            .map(|(key, value)| Ok((key, header_value(key, value.as_ref())?)))
            .collect::<Result<Vec<_>>>()?;

        let mut headers = self.headers.write();
        for (key, value) in parsed {
            headers.insert(key.header_name(), value);
        }
        Ok(())
    }

    /// Remove several headers
    pub fn header_remove_multiple<I>(&self, keys: I)
    where
        I: IntoIterator<Item = HeaderKey>,
    {
        let mut headers = self.headers.write();
        for key in keys {
            headers.remove(key.header_name());
        }
    }

    // Cookies

    /// Cookie jar attached to requests
    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    /// Set a cookie with optional attributes; invalid attributes leave the
    /// jar untouched
    pub fn cookie_update<I, S>(&self, key: CookieKey, value: &str, attributes: I) -> Result<()>
    where
        I: IntoIterator<Item = (CookieAttribute, S)>,
        S: AsRef<str>,
    {
        let mut cookie = Cookie::new(key.as_str(), value);
        for (attribute, raw) in attributes {
            cookie.apply_attribute(attribute, raw.as_ref())?;
        }
        self.cookies.remove_by_name(key.as_str());
        self.cookies.add(cookie);
        Ok(())
    }

    /// Set several plain cookies
    pub fn cookie_update_multiple<I, S>(&self, entries: I)
    where
        I: IntoIterator<Item = (CookieKey, S)>,
        S: AsRef<str>,
    {
        for (key, value) in entries {
            self.cookies.remove_by_name(key.as_str());
            self.cookies.add(Cookie::new(key.as_str(), value.as_ref()));
        }
    }

    /// Value of a cookie
    pub fn cookie_get(&self, key: CookieKey) -> Option<String> {
        self.cookies.get_by_name(key.as_str()).map(|c| c.value)
    }

    /// Attributes of a cookie
    pub fn cookie_attributes(&self, key: CookieKey) -> Option<BTreeMap<CookieAttribute, String>> {
        self.cookies.get_by_name(key.as_str()).map(|c| c.attributes())
    }

    /// Remove a cookie; `true` if one was stored
    pub fn cookie_remove(&self, key: CookieKey) -> bool {
        self.cookies.remove_by_name(key.as_str()) > 0
    }

    /// Every stored cookie, sorted by name
    pub fn cookie_get_all(&self) -> Vec<Cookie> {
        self.cookies.all()
    }
}

fn header_value(key: HeaderKey, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::config(format!("invalid value for header {}: {}", key, e)))
}
