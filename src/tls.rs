// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! TLS trust context for the default transport

use std::fmt;
use std::path::{Path, PathBuf};

use reqwest::tls::{Certificate, Version};
use reqwest::ClientBuilder;

use crate::config::SecureConfig;
use crate::error::{Error, Result};

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";

/// Which certificates the transport trusts
#[derive(Clone)]
pub enum TlsContext {
    /// Built-in webpki roots
    System,
    /// Only the certificates of a local PEM bundle
    Pinned {
        path: PathBuf,
        certificates: Vec<Certificate>,
    },
    /// Certificate verification disabled
    Insecure {
        /// `false` when TLS was turned off rather than unsafe mode requested
        use_tls: bool,
    },
}

impl TlsContext {
    /// Select a context.
    ///
    /// Unsafe mode (or TLS turned off) wins over a bundle; a bundle that
    /// exists on disk wins over the system roots.
    pub fn build(bundle: Option<&Path>, use_tls: bool, unsafe_mode: bool) -> Result<Self> {
        if unsafe_mode || !use_tls {
            return Ok(TlsContext::Insecure { use_tls });
        }

        match bundle {
            Some(path) if path.is_file() => Self::from_pem(path),
            _ => Ok(TlsContext::System),
        }
    }

    /// `build` driven by a config, warning about insecure contexts
    pub fn from_config(config: &SecureConfig, bundle: Option<&Path>) -> Result<Self> {
        let context = Self::build(bundle, config.use_tls, config.unsafe_mode)?;
        if !context.is_safe() && !config.suppress_warnings {
            tracing::warn!(
                category = "Tls",
                use_tls = config.use_tls,
                "certificate verification is disabled; connections are not authenticated"
            );
        }
        tracing::debug!(category = "Tls", context = ?context, "TLS context ready");
        Ok(context)
    }

    /// Load every certificate of a PEM bundle
    pub fn from_pem(path: &Path) -> Result<Self> {
        let pem = std::fs::read_to_string(path)?;
        let certificates = split_pem(&pem)
            .into_iter()
            .map(|block| {
                Certificate::from_pem(block.as_bytes()).map_err(|e| {
                    Error::tls(format!("invalid certificate in {}: {}", path.display(), e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if certificates.is_empty() {
            return Err(Error::tls(format!(
                "no certificates found in {}",
                path.display()
            )));
        }

        let context = TlsContext::Pinned {
            path: path.to_path_buf(),
            certificates,
        };
        // rustls only decodes the DER when a client is built
        context
            .apply(reqwest::Client::builder())
            .build()
            .map_err(|e| {
                Error::tls(format!("invalid certificate in {}: {}", path.display(), e))
            })?;
        Ok(context)
    }

    /// Configure `builder` for this context. TLS 1.2 is the floor for all
    /// of them.
    pub fn apply(&self, builder: ClientBuilder) -> ClientBuilder {
        let builder = builder
            .use_rustls_tls()
            .min_tls_version(Version::TLS_1_2);

        match self {
            TlsContext::System => builder,
            TlsContext::Pinned { certificates, .. } => certificates
                .iter()
                .cloned()
                .fold(builder.tls_built_in_root_certs(false), |b, cert| {
                    b.add_root_certificate(cert)
                }),
            TlsContext::Insecure { .. } => builder.danger_accept_invalid_certs(true),
        }
    }

    /// Certificates are verified
    pub fn is_safe(&self) -> bool {
        !matches!(self, TlsContext::Insecure { .. })
    }

    /// TLS was not switched off
    pub fn uses_tls(&self) -> bool {
        !matches!(self, TlsContext::Insecure { use_tls: false })
    }

    /// `[SAFE]` or `[UNSAFE]`
    pub fn safety_tag(&self) -> &'static str {
        if self.is_safe() {
            "[SAFE]"
        } else {
            "[UNSAFE]"
        }
    }

    /// `[TLS]` or `[NO TLS]`
    pub fn tls_tag(&self) -> &'static str {
        if self.uses_tls() {
            "[TLS]"
        } else {
            "[NO TLS]"
        }
    }

    /// Both log tags, e.g. `[SAFE][TLS]`
    pub fn label(&self) -> String {
        format!("{}{}", self.safety_tag(), self.tls_tag())
    }

    /// Number of pinned trust anchors
    pub fn certificate_count(&self) -> usize {
        match self {
            TlsContext::Pinned { certificates, .. } => certificates.len(),
            _ => 0,
        }
    }
}

impl fmt::Debug for TlsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TlsContext::System => f.write_str("System"),
            TlsContext::Pinned { path, certificates } => f
                .debug_struct("Pinned")
                .field("path", path)
                .field("certificates", &certificates.len())
                .finish(),
            TlsContext::Insecure { use_tls } => f
                .debug_struct("Insecure")
                .field("use_tls", use_tls)
                .finish(),
        }
    }
}

/// Split a PEM bundle into its `CERTIFICATE` blocks
pub fn split_pem(pem: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = pem;
    while let Some(start) = rest.find(PEM_BEGIN) {
        let tail = &rest[start..];
        let Some(end) = tail.find(PEM_END) else {
            break;
        };
        let stop = end + PEM_END.len();
        blocks.push(&tail[..stop]);
        rest = &tail[stop..];
    }
    blocks
}
