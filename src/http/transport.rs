// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request dispatch seam
//!
//! Everything that goes over the wire, certificate downloads included, passes
//! through a [`Transport`]. The default wraps a `reqwest::Client` configured
//! from a [`TlsContext`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;

use super::request::Request;
use super::response::Response;
use crate::error::Result;
use crate::tls::TlsContext;

/// Maximum redirects followed by the default transport
pub const MAX_REDIRECTS: usize = 10;

/// Executes one request and returns the full response
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request`. Any status code is a successful dispatch; only
    /// connection-level failures are errors.
    async fn execute(&self, request: Request) -> Result<Response>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client trusting what `tls` allows
    pub fn new(tls: &TlsContext, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().redirect(Policy::limited(MAX_REDIRECTS));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = tls.apply(builder).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: Request) -> Result<Response> {
        let start = Instant::now();

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let final_url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        let response_time = start.elapsed().as_millis() as u64;

        Ok(Response::new(status, headers, body, final_url, response_time))
    }
}
