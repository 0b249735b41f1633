// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for secure-requests
//!
//! Request/response types, the transport seam, default header generation
//! and the cookie jar used by the request facade.

mod cookie;
pub mod headers;
mod request;
mod response;
mod transport;

pub use cookie::{Cookie, CookieJar, Priority, SameSite};
pub use headers::{default_headers, generate_headers, merge_headers};
pub use request::{parse_method, Payload, Request, SUPPORTED_METHODS};
pub use response::Response;
pub use transport::{ReqwestTransport, Transport, MAX_REDIRECTS};
