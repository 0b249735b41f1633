// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Header and cookie name catalogs
//!
//! Fixed sets of tagged identifiers mapped to their wire names through a
//! single lookup table per catalog.

use std::fmt;
use std::str::FromStr;

use reqwest::header::HeaderName;

use crate::error::Error;

macro_rules! string_catalog {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every entry, in table order
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Wire name
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $value, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|entry| entry.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| Error::config(format!(
                        "unknown {} '{}'",
                        stringify!($name),
                        s
                    )))
            }
        }
    };
}

string_catalog! {
    /// Request and response header names
    HeaderKey {
        Accept => "Accept",
        AcceptEncoding => "Accept-Encoding",
        AcceptLanguage => "Accept-Language",
        AccessControlAllowHeaders => "Access-Control-Allow-Headers",
        AccessControlAllowMethods => "Access-Control-Allow-Methods",
        AccessControlAllowOrigin => "Access-Control-Allow-Origin",
        AccessControlExposeHeaders => "Access-Control-Expose-Headers",
        Authorization => "Authorization",
        CacheControl => "Cache-Control",
        Connection => "Connection",
        ContentType => "Content-Type",
        Cookie => "Cookie",
        /// Do Not Track
        Dnt => "DNT",
        ETag => "ETag",
        IfModifiedSince => "If-Modified-Since",
        IfNoneMatch => "If-None-Match",
        LastModified => "Last-Modified",
        Location => "Location",
        Origin => "Origin",
        Prefer => "Prefer",
        ProxyAuthorization => "Proxy-Authorization",
        Referer => "Referer",
        SecChUa => "Sec-Ch-Ua",
        SecChUaMobile => "Sec-Ch-Ua-Mobile",
        SecChUaPlatform => "Sec-Ch-Ua-Platform",
        SecFetchDest => "Sec-Fetch-Dest",
        SecFetchMode => "Sec-Fetch-Mode",
        SecFetchSite => "Sec-Fetch-Site",
        UserAgent => "User-Agent",
        XAuthToken => "X-Auth-Token",
        XContentDuration => "X-Content-Duration",
        XContentSecurityPolicy => "X-Content-Security-Policy",
        XContentTypeOptions => "X-Content-Type-Options",
        XCorrelationId => "X-Correlation-ID",
        XCustomHeader => "X-Custom-Header",
        XDownloadOptions => "X-Download-Options",
        XFeaturePolicy => "X-Feature-Policy",
        XForwardedFor => "X-Forwarded-For",
        XForwardedHost => "X-Forwarded-Host",
        XForwardedProto => "X-Forwarded-Proto",
        XForwardedServer => "X-Forwarded-Server",
        XFrameOptions => "X-Frame-Options",
        XHttpMethodOverride => "X-HTTP-Method-Override",
        XPermittedCrossDomainPolicies => "X-Permitted-Cross-Domain-Policies",
        XPingback => "X-Pingback",
        XPoweredBy => "X-Powered-By",
        XRateLimitLimit => "X-RateLimit-Limit",
        XRateLimitRemaining => "X-RateLimit-Remaining",
        XRateLimitReset => "X-RateLimit-Reset",
        XRealIp => "X-Real-IP",
        XRequestId => "X-Request-ID",
        XRequestedWith => "X-Requested-With",
        XWebkitCsp => "X-WebKit-CSP",
        XXssProtection => "X-XSS-Protection",
    }
}

impl HeaderKey {
    /// Header name for use with `reqwest` header maps (lowercased)
    pub fn header_name(&self) -> HeaderName {
        // every table entry is a valid RFC 7230 token
        HeaderName::from_bytes(self.as_str().as_bytes())
            .expect("catalog header names are valid tokens")
    }
}

string_catalog! {
    /// Common cookie names
    CookieKey {
        SessionId => "session_id",
        UserPreferences => "user_preferences",
        AuthToken => "auth_token",
        CsrfToken => "csrf_token",
        TrackingId => "tracking_id",
        Referrer => "referrer",
        LastVisit => "last_visit",
        Language => "language",
        LoginTimestamp => "login_timestamp",
        SessionExpires => "session_expires",
        RememberMe => "remember_me",
        PrefLanguage => "pref_language",
        Locale => "locale",
        Country => "country",
        Timezone => "timezone",
        ReferringUrl => "referring_url",
        DeviceId => "device_id",
        BrowserId => "browser_id",
        ClientId => "client_id",
        AnonymousId => "anonymous_id",
        TrackingToken => "tracking_token",
        OptIn => "opt_in",
        SecurityToken => "security_token",
        AuthMethod => "auth_method",
        SessionIdHash => "session_id_hash",
        UserId => "user_id",
        RefreshToken => "refresh_token",
        ApiKey => "api_key",
        CsrfRefreshToken => "csrf_refresh_token",
        EncryptionKey => "encryption_key",
        EncryptionIv => "encryption_iv",
        DataKey => "data_key",
        DataIv => "data_iv",
        CookieConsent => "cookie_consent",
        SessionType => "session_type",
        AppVersion => "app_version",
        DeviceType => "device_type",
        FeatureFlags => "feature_flags",
        ExperimentId => "experiment_id",
        UserRole => "user_role",
        LoginMethod => "login_method",
    }
}

string_catalog! {
    /// Cookie attributes settable through the enum-keyed helpers
    CookieAttribute {
        Domain => "domain",
        Path => "path",
        /// RFC 2822 or RFC 3339 timestamp
        Expires => "expires",
        Secure => "secure",
        HttpOnly => "httponly",
        SameSite => "samesite",
        /// Seconds
        MaxAge => "max_age",
        Priority => "priority",
        SameParty => "sameparty",
        Partitioned => "partitioned",
        Extension => "extension",
    }
}
