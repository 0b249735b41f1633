// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP status classification
//!
//! A static table maps every error status this crate raises on to a
//! [`StatusKind`] tag and a reason phrase. Errors are built on demand from the
//! table instead of one type per status code.

use std::fmt;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of an error status, named after its reason phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    BadRequest,
    Unauthorized,
    PaymentRequired,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    NotAcceptable,
    ProxyAuthenticationRequired,
    RequestTimeout,
    Conflict,
    Gone,
    LengthRequired,
    PreconditionFailed,
    PayloadTooLarge,
    UriTooLong,
    UnsupportedMediaType,
    RangeNotSatisfiable,
    ExpectationFailed,
    MisdirectedRequest,
    UnprocessableEntity,
    Locked,
    FailedDependency,
    TooEarly,
    UpgradeRequired,
    PreconditionRequired,
    TooManyRequests,
    RequestHeaderFieldsTooLarge,
    UnavailableForLegalReasons,
    InternalServerError,
    NotImplemented,
    BadGateway,
    ServiceUnavailable,
    GatewayTimeout,
    HttpVersionNotSupported,
    VariantAlsoNegotiates,
    InsufficientStorage,
    LoopDetected,
    NotExtended,
    NetworkAuthenticationRequired,
    /// Cloudflare 520
    UnknownError,
    /// Cloudflare 521
    WebServerDown,
    /// Cloudflare 522
    ConnectionTimedOut,
    /// Cloudflare 523
    OriginUnreachable,
    /// Cloudflare 524
    TimeoutOccurred,
    /// Unofficial 598
    NetworkReadTimeout,
    /// Unofficial 599
    NetworkConnectTimeout,
    /// 4xx/5xx status with no entry in the table
    Unclassified,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Sorted by code; looked up with a binary search.
static STATUS_TABLE: &[(u16, StatusKind, &str)] = &[
    (400, StatusKind::BadRequest, "Bad Request"),
    (401, StatusKind::Unauthorized, "Unauthorized"),
    (402, StatusKind::PaymentRequired, "Payment Required"),
    (403, StatusKind::Forbidden, "Forbidden"),
    (404, StatusKind::NotFound, "Not Found"),
    (405, StatusKind::MethodNotAllowed, "Method Not Allowed"),
    (406, StatusKind::NotAcceptable, "Not Acceptable"),
    (407, StatusKind::ProxyAuthenticationRequired, "Proxy Authentication Required"),
    (408, StatusKind::RequestTimeout, "Request Timeout"),
    (409, StatusKind::Conflict, "Conflict"),
    (410, StatusKind::Gone, "Gone"),
    (411, StatusKind::LengthRequired, "Length Required"),
    (412, StatusKind::PreconditionFailed, "Precondition Failed"),
    (413, StatusKind::PayloadTooLarge, "Payload Too Large"),
    (414, StatusKind::UriTooLong, "URI Too Long"),
    (415, StatusKind::UnsupportedMediaType, "Unsupported Media Type"),
    (416, StatusKind::RangeNotSatisfiable, "Range Not Satisfiable"),
    (417, StatusKind::ExpectationFailed, "Expectation Failed"),
    (421, StatusKind::MisdirectedRequest, "Misdirected Request"),
    (422, StatusKind::UnprocessableEntity, "Unprocessable Entity"),
    (423, StatusKind::Locked, "Locked"),
    (424, StatusKind::FailedDependency, "Failed Dependency"),
    (425, StatusKind::TooEarly, "Too Early"),
    (426, StatusKind::UpgradeRequired, "Upgrade Required"),
    (428, StatusKind::PreconditionRequired, "Precondition Required"),
    (429, StatusKind::TooManyRequests, "Too Many Requests"),
    (431, StatusKind::RequestHeaderFieldsTooLarge, "Request Header Fields Too Large"),
    (451, StatusKind::UnavailableForLegalReasons, "Unavailable For Legal Reasons"),
    (500, StatusKind::InternalServerError, "Internal Server Error"),
    (501, StatusKind::NotImplemented, "Not Implemented"),
    (502, StatusKind::BadGateway, "Bad Gateway"),
    (503, StatusKind::ServiceUnavailable, "Service Unavailable"),
    (504, StatusKind::GatewayTimeout, "Gateway Timeout"),
    (505, StatusKind::HttpVersionNotSupported, "HTTP Version Not Supported"),
    (506, StatusKind::VariantAlsoNegotiates, "Variant Also Negotiates"),
    (507, StatusKind::InsufficientStorage, "Insufficient Storage"),
    (508, StatusKind::LoopDetected, "Loop Detected"),
    (510, StatusKind::NotExtended, "Not Extended"),
    (511, StatusKind::NetworkAuthenticationRequired, "Network Authentication Required"),
    (520, StatusKind::UnknownError, "Unknown Error"),
    (521, StatusKind::WebServerDown, "Web Server Is Down"),
    (522, StatusKind::ConnectionTimedOut, "Connection Timed Out"),
    (523, StatusKind::OriginUnreachable, "Origin Is Unreachable"),
    (524, StatusKind::TimeoutOccurred, "A Timeout Occurred"),
    (598, StatusKind::NetworkReadTimeout, "Network Read Timeout"),
    (599, StatusKind::NetworkConnectTimeout, "Network Connect Timeout"),
];

/// Look up a status code in the table
pub fn lookup(code: u16) -> Option<(StatusKind, &'static str)> {
    STATUS_TABLE
        .binary_search_by_key(&code, |&(c, _, _)| c)
        .ok()
        .map(|idx| (STATUS_TABLE[idx].1, STATUS_TABLE[idx].2))
}

/// Reason phrase for any status code
pub fn reason_phrase(code: u16) -> &'static str {
    lookup(code)
        .map(|(_, reason)| reason)
        .or_else(|| StatusCode::from_u16(code).ok().and_then(|s| s.canonical_reason()))
        .unwrap_or("Unknown")
}

/// Error raised for a response with an error status
#[derive(Error, Debug, Clone)]
#[error("{code} Error: {reason} ({kind}) from {url}")]
pub struct StatusError {
    /// Classification tag
    pub kind: StatusKind,
    /// Status code
    pub code: u16,
    /// Reason phrase
    pub reason: &'static str,
    /// Request URL
    pub url: String,
    /// Response body (lossy UTF-8)
    pub body: String,
}

impl StatusError {
    /// Build the error for `code`, or `None` when the status is not an error.
    ///
    /// Table entries keep their own kind; any other 4xx/5xx becomes
    /// [`StatusKind::Unclassified`]. 1xx, 2xx and 3xx never produce an error.
    pub fn check(code: u16, url: impl Into<String>, body: impl Into<String>) -> Option<Self> {
        let kind = match lookup(code) {
            Some((kind, _)) => kind,
            None if (400..600).contains(&code) => StatusKind::Unclassified,
            None => return None,
        };

        Some(Self {
            kind,
            code,
            reason: reason_phrase(code),
            url: url.into(),
            body: body.into(),
        })
    }
}
