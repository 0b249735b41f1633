// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Logging setup and request records

use std::fmt;
use std::fs;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::config::SecureConfig;
use crate::error::{Error, Result};

/// Install the global `tracing` subscriber described by `config`.
///
/// `RUST_LOG` takes precedence over the configured level. Returns `false`
/// when nothing was installed, either because `silent` is set or because a
/// subscriber already exists.
pub fn init_logging(config: &SecureConfig) -> Result<bool> {
    if config.silent {
        return Ok(false);
    }

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| Error::config(format!("invalid log level '{}': {}", config.log_level, e)))?;

    let installed = if config.log_to_file {
        if let Some(parent) = config.log_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_path)?;

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::debug!(
            category = "Config",
            level = %config.log_level,
            file = config.log_to_file,
            "logging initialized"
        );
    }
    Ok(installed)
}

/// Scheme, host and port of `url`, nothing else
pub fn redact_url(url: &Url) -> String {
    let host = url.host_str().unwrap_or("");
    match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    }
}

/// Outcome of one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestRecord {
    pub timestamp: DateTime<Utc>,
    pub method: String,
    pub url: String,
    pub status: u16,
    pub reason: String,
    /// Certificates were verified
    pub safe: bool,
    /// TLS was enabled
    pub tls: bool,
    pub elapsed_ms: u64,
}

impl RequestRecord {
    /// Build a record
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        timestamp: DateTime<Utc>,
        method: &Method,
        url: &Url,
        status: u16,
        reason: impl Into<String>,
        safe: bool,
        tls: bool,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            timestamp,
            method: method.to_string(),
            url: url.to_string(),
            status,
            reason: reason.into(),
            safe,
            tls,
            elapsed_ms,
        }
    }

    /// `[SAFE]` or `[UNSAFE]`
    pub fn safety_tag(&self) -> &'static str {
        if self.safe {
            "[SAFE]"
        } else {
            "[UNSAFE]"
        }
    }

    /// `[TLS]` or `[NO TLS]`
    pub fn tls_tag(&self) -> &'static str {
        if self.tls {
            "[TLS]"
        } else {
            "[NO TLS]"
        }
    }

    /// Emit the record as a `tracing` event
    pub fn emit(&self) {
        if self.status >= 400 {
            tracing::warn!(
                category = "Request",
                method = %self.method,
                url = %self.url,
                status = self.status,
                elapsed_ms = self.elapsed_ms,
                "{}",
                self
            );
        } else {
            tracing::info!(
                category = "Request",
                method = %self.method,
                url = %self.url,
                status = self.status,
                elapsed_ms = self.elapsed_ms,
                "{}",
                self
            );
        }
    }
}

impl fmt::Display for RequestRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]{}{} {} request to {} with Status Code {} - {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.safety_tag(),
            self.tls_tag(),
            self.method,
            self.url,
            self.status,
            self.reason
        )
    }
}
