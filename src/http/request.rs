// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP request types

use crate::error::{Error, Result};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use std::time::Duration;
use url::Url;

/// Methods the request facade dispatches
pub const SUPPORTED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
];

/// Parse and check a method name
pub fn parse_method(method: &str) -> Result<Method> {
    let parsed = Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| Error::UnsupportedMethod(method.to_string()))?;
    if SUPPORTED_METHODS.contains(&parsed) {
        Ok(parsed)
    } else {
        Err(Error::UnsupportedMethod(method.to_string()))
    }
}

/// HTTP request representation
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Option<Bytes>,
    /// Request timeout
    pub timeout: Option<Duration>,
}

/// Request body
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `application/x-www-form-urlencoded` pairs
    Form(Vec<(String, String)>),
    /// JSON document
    Json(serde_json::Value),
    /// Raw bytes, content type left to the caller
    Raw(Bytes),
}

impl Payload {
    /// Form payload from pairs
    pub fn form<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Payload::Form(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Encoded body and its content type
    pub fn encode(&self) -> Result<(Bytes, Option<&'static str>)> {
        match self {
            Payload::Form(pairs) => {
                let body = pairs
                    .iter()
                    .map(|(k, v)| format!("{}={}", urlencoding_encode(k), urlencoding_encode(v)))
                    .collect::<Vec<_>>()
                    .join("&");
                Ok((Bytes::from(body), Some("application/x-www-form-urlencoded")))
            }
            Payload::Json(value) => Ok((
                Bytes::from(serde_json::to_vec(value)?),
                Some("application/json"),
            )),
            Payload::Raw(bytes) => Ok((bytes.clone(), None)),
        }
    }
}

impl Request {
    /// Create a new GET request
    pub fn get(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::GET, url)
    }

    /// Create a new request with arbitrary method
    pub fn new(method: Method, url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            method,
            url: Url::parse(url.as_ref())?,
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        })
    }

    /// Set a header
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Set the request body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Encode a payload as the body, setting its content type
    pub fn payload(mut self, payload: &Payload) -> Result<Self> {
        let (body, content_type) = payload.encode()?;
        if let Some(content_type) = content_type {
            self.headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        self.body = Some(body);
        Ok(self)
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Body size in bytes
    pub fn body_len(&self) -> usize {
        self.body.as_ref().map_or(0, |b| b.len())
    }
}

/// URL encode a string
fn urlencoding_encode(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(c),
            ' ' => result.push('+'),
            _ => {
                for byte in c.to_string().bytes() {
                    result.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_creation() {
        let req = Request::get("https://example.com/path").unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.url.host_str(), Some("example.com"));
        assert_eq!(req.body_len(), 0);
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("post").unwrap(), Method::POST);
        assert_eq!(parse_method("PATCH").unwrap(), Method::PATCH);
        assert!(matches!(parse_method("HEAD"), Err(Error::UnsupportedMethod(_))));
        assert!(matches!(parse_method("BREW"), Err(Error::UnsupportedMethod(_))));
    }

    #[test]
    fn test_form_payload() {
        let req = Request::new(Method::POST, "https://example.com")
            .unwrap()
            .payload(&Payload::form([("q", "a b"), ("x", "ä")]))
            .unwrap();

        assert_eq!(req.body.as_deref(), Some(&b"q=a+b&x=%C3%A4"[..]));
        assert_eq!(
            req.headers.get(CONTENT_TYPE).map(|v| v.to_str().unwrap()),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn test_json_payload() {
        let req = Request::new(Method::PUT, "https://example.com")
            .unwrap()
            .payload(&Payload::Json(serde_json::json!({"a": 1})))
            .unwrap();

        assert_eq!(req.body.as_deref(), Some(&br#"{"a":1}"#[..]));
        assert_eq!(
            req.headers.get(CONTENT_TYPE).map(|v| v.to_str().unwrap()),
            Some("application/json")
        );
    }
}
