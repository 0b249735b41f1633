// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Configuration for [`SecureRequests`](crate::SecureRequests)
//!
//! Values come from `Default`, builder setters, a JSON document or
//! `SECURE_REQUESTS_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::certificate::ChecksumExpectation;
use crate::error::{Error, Result};

/// Default CA bundle mirror
pub const DEFAULT_CERTIFICATE_URL: &str = "https://curl.se/ca/cacert.pem";

/// Default local bundle path
pub const DEFAULT_CERTIFICATE_PATH: &str = "cacert.pem";

/// Suffix appended to the bundle URL path to locate its checksum file
pub const DEFAULT_CHECKSUM_SUFFIX: &str = ".sha256";

/// Default log file
pub const DEFAULT_LOG_PATH: &str = "secureRequests.log";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecureConfig {
    /// Use the hardened TLS transport; `false` disables verification
    pub use_tls: bool,
    /// Skip certificate verification entirely (dangerous!)
    pub unsafe_mode: bool,
    /// Fetch the CA bundle when the client is built
    pub certificate_need_fetch: bool,
    /// Where the CA bundle is downloaded from
    pub certificate_url: String,
    /// Where the CA bundle is stored
    pub certificate_path: PathBuf,
    /// Fetch `<certificate_url><checksum_suffix>` and verify against it
    pub certificate_verify_checksum: bool,
    /// Expected SHA-256 of the bundle; wins over `certificate_verify_checksum`
    pub certificate_checksum: Option<String>,
    /// Checksum file suffix
    pub checksum_suffix: String,
    /// Log only scheme and host of the bundle URL
    pub redact_certificate_url: bool,
    /// Write logs to `log_path` instead of stderr
    pub log_to_file: bool,
    /// `EnvFilter` directive, e.g. `debug` or `secure_requests=info`
    pub log_level: String,
    /// Log file
    pub log_path: PathBuf,
    /// Include headers and payload size in request log lines
    pub log_extensive: bool,
    /// Emit no log output at all
    pub silent: bool,
    /// Don't warn when verification is disabled
    pub suppress_warnings: bool,
    /// Per-request timeout; `None` keeps the HTTP client default
    pub timeout_secs: Option<u64>,
}

impl Default for SecureConfig {
    fn default() -> Self {
        Self {
            use_tls: true,
            unsafe_mode: false,
            certificate_need_fetch: true,
            certificate_url: DEFAULT_CERTIFICATE_URL.to_string(),
            certificate_path: PathBuf::from(DEFAULT_CERTIFICATE_PATH),
            certificate_verify_checksum: false,
            certificate_checksum: None,
            checksum_suffix: DEFAULT_CHECKSUM_SUFFIX.to_string(),
            redact_certificate_url: true,
            log_to_file: false,
            log_level: "debug".to_string(),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            log_extensive: false,
            silent: false,
            suppress_warnings: false,
            timeout_secs: None,
        }
    }
}

/// Environment variable names, one per option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVars {
    pub use_tls: String,
    pub unsafe_mode: String,
    pub certificate_need_fetch: String,
    pub certificate_url: String,
    pub certificate_path: String,
    pub certificate_verify_checksum: String,
    pub certificate_checksum: String,
    pub checksum_suffix: String,
    pub redact_certificate_url: String,
    pub log_to_file: String,
    pub log_level: String,
    pub log_path: String,
    pub log_extensive: String,
    pub silent: String,
    pub suppress_warnings: String,
    pub timeout_secs: String,
}

impl Default for EnvVars {
    fn default() -> Self {
        let var = |suffix: &str| format!("SECURE_REQUESTS_{}", suffix);
        Self {
            use_tls: var("USE_TLS"),
            unsafe_mode: var("UNSAFE"),
            certificate_need_fetch: var("CERTIFICATE_NEED_FETCH"),
            certificate_url: var("CERTIFICATE_URL"),
            certificate_path: var("CERTIFICATE_PATH"),
            certificate_verify_checksum: var("CERTIFICATE_VERIFY_CHECKSUM"),
            certificate_checksum: var("CERTIFICATE_CHECKSUM"),
            checksum_suffix: var("CHECKSUM_SUFFIX"),
            redact_certificate_url: var("CERTIFICATE_REDACT_URL"),
            log_to_file: var("LOG_TO_FILE"),
            log_level: var("LOG_LEVEL"),
            log_path: var("LOG_PATH"),
            log_extensive: var("LOG_EXTENSIVE"),
            silent: var("SILENT"),
            suppress_warnings: var("SUPPRESS_WARNINGS"),
            timeout_secs: var("TIMEOUT_SECS"),
        }
    }
}

/// `true` for `true`, `1`, `t`, `y`, `yes` (any case); `false` otherwise
pub fn parse_env_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "t" | "y" | "yes"
    )
}

impl SecureConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(&EnvVars::default())
    }

    /// Read overrides from the process environment using custom variable names
    pub fn from_env_with(vars: &EnvVars) -> Result<Self> {
        Self::from_lookup(vars, |name| std::env::var(name).ok())
    }

    /// Apply overrides from any key/value source on top of the defaults
    pub fn from_lookup<F>(vars: &EnvVars, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let flag = |name: &str, default: bool| lookup(name).map_or(default, |v| parse_env_bool(&v));

        config.use_tls = flag(&vars.use_tls, config.use_tls);
        config.unsafe_mode = flag(&vars.unsafe_mode, config.unsafe_mode);
        config.certificate_need_fetch =
            flag(&vars.certificate_need_fetch, config.certificate_need_fetch);
        config.certificate_verify_checksum =
            flag(&vars.certificate_verify_checksum, config.certificate_verify_checksum);
        config.redact_certificate_url =
            flag(&vars.redact_certificate_url, config.redact_certificate_url);
        config.log_to_file = flag(&vars.log_to_file, config.log_to_file);
        config.log_extensive = flag(&vars.log_extensive, config.log_extensive);
        config.silent = flag(&vars.silent, config.silent);
        config.suppress_warnings = flag(&vars.suppress_warnings, config.suppress_warnings);

        if let Some(url) = lookup(&vars.certificate_url) {
            config.certificate_url = url;
        }
        if let Some(path) = lookup(&vars.certificate_path) {
            config.certificate_path = PathBuf::from(path);
        }
        if let Some(digest) = lookup(&vars.certificate_checksum) {
            let digest = digest.trim();
            if !digest.is_empty() {
                config.certificate_checksum = Some(digest.to_string());
            }
        }
        if let Some(suffix) = lookup(&vars.checksum_suffix) {
            config.checksum_suffix = suffix;
        }
        if let Some(level) = lookup(&vars.log_level) {
            config.log_level = level;
        }
        if let Some(path) = lookup(&vars.log_path) {
            config.log_path = PathBuf::from(path);
        }
        if let Some(secs) = lookup(&vars.timeout_secs) {
            let secs = secs.trim().parse::<u64>().map_err(|e| {
                Error::config(format!("{} must be a number of seconds: {}", vars.timeout_secs, e))
            })?;
            config.timeout_secs = Some(secs);
        }

        Ok(config)
    }

    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check that the certificate URL is usable
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.certificate_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "certificate URL must be http(s), got '{}'",
                url.scheme()
            )));
        }
        if self.checksum_suffix.is_empty() && self.certificate_verify_checksum {
            return Err(Error::config("checksum suffix must not be empty"));
        }
        Ok(())
    }

    /// Verification policy for the configured bundle
    pub fn checksum_expectation(&self) -> ChecksumExpectation {
        match self.certificate_checksum {
            Some(ref digest) => ChecksumExpectation::Explicit(digest.clone()),
            None if self.certificate_verify_checksum => ChecksumExpectation::FetchFromSource,
            None => ChecksumExpectation::Skip,
        }
    }

    /// Whether certificate verification is off
    pub fn is_insecure(&self) -> bool {
        self.unsafe_mode || !self.use_tls
    }

    /// Request timeout
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Enable/disable the TLS transport
    pub fn use_tls(mut self, enabled: bool) -> Self {
        self.use_tls = enabled;
        self
    }

    /// Enable/disable unsafe mode
    pub fn unsafe_mode(mut self, enabled: bool) -> Self {
        self.unsafe_mode = enabled;
        self
    }

    /// Fetch the bundle on build
    pub fn certificate_need_fetch(mut self, fetch: bool) -> Self {
        self.certificate_need_fetch = fetch;
        self
    }

    /// Set bundle URL
    pub fn certificate_url(mut self, url: impl Into<String>) -> Self {
        self.certificate_url = url.into();
        self
    }

    /// Set bundle path
    pub fn certificate_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.certificate_path = path.into();
        self
    }

    /// Verify against the published checksum file
    pub fn certificate_verify_checksum(mut self, verify: bool) -> Self {
        self.certificate_verify_checksum = verify;
        self
    }

    /// Verify against an explicit SHA-256 digest
    pub fn certificate_checksum(mut self, digest: impl Into<String>) -> Self {
        self.certificate_checksum = Some(digest.into());
        self
    }

    /// Set checksum file suffix
    pub fn checksum_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.checksum_suffix = suffix.into();
        self
    }

    /// Redact the bundle URL in logs
    pub fn redact_certificate_url(mut self, redact: bool) -> Self {
        self.redact_certificate_url = redact;
        self
    }

    /// Log to a file
    pub fn log_to_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_to_file = true;
        self.log_path = path.into();
        self
    }

    /// Set log level directive
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Log headers and payload sizes
    pub fn log_extensive(mut self, extensive: bool) -> Self {
        self.log_extensive = extensive;
        self
    }

    /// Silence all logging
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Suppress unsafe-mode warnings
    pub fn suppress_warnings(mut self, suppress: bool) -> Self {
        self.suppress_warnings = suppress;
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs());
        self
    }

    /// Config for tests and local development: no bundle fetch, no output
    pub fn offline() -> Self {
        Self {
            certificate_need_fetch: false,
            silent: true,
            ..Default::default()
        }
    }
}
