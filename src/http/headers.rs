// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browser-like default request headers

use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::catalog::HeaderKey;

/// Chrome major versions a generated profile claims
pub const CHROME_MAJORS: std::ops::RangeInclusive<u16> = 110..=125;

/// `User-Agent` platform tokens
pub const PLATFORMS: [&str; 6] = [
    "Windows NT 10.0; Win64; x64",
    "Windows NT 6.1; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "Macintosh; Intel Mac OS X 11_2_3",
    "X11; Linux x86_64",
    "X11; Ubuntu; Linux x86_64",
];

/// `Sec-Ch-Ua-Platform` values
pub const CLIENT_HINT_PLATFORMS: [&str; 3] = ["Windows", "Macintosh", "X11"];

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Build the default header set, then lay `custom` over it.
///
/// Custom entries replace defaults of the same name and are appended
/// otherwise.
pub fn generate_headers<R: Rng + ?Sized>(custom: &HeaderMap, rng: &mut R) -> HeaderMap {
    let major = rng.gen_range(CHROME_MAJORS);
    let platform = PLATFORMS.choose(rng).copied().unwrap_or(PLATFORMS[0]);
    let hint_platform = CLIENT_HINT_PLATFORMS
        .choose(rng)
        .copied()
        .unwrap_or(CLIENT_HINT_PLATFORMS[0]);

    let defaults = [
        (HeaderKey::Accept, FORM_URLENCODED.to_string()),
        (HeaderKey::ContentType, FORM_URLENCODED.to_string()),
        (
            HeaderKey::SecChUa,
            format!(
                "\"Google Chrome\";v=\"{major}\", \"Chromium\";v=\"{major}\", \"Not.A/Brand\";v=\"24\""
            ),
        ),
        (HeaderKey::SecChUaMobile, "?0".to_string()),
        (HeaderKey::SecChUaPlatform, format!("\"{hint_platform}\"")),
        (HeaderKey::SecFetchDest, "empty".to_string()),
        (HeaderKey::SecFetchMode, "cors".to_string()),
        (HeaderKey::SecFetchSite, "same-site".to_string()),
        (
            HeaderKey::UserAgent,
            format!(
                "Mozilla/5.0 ({platform}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{major}.0.0.0 Safari/537.36"
            ),
        ),
    ];

    let mut headers = HeaderMap::with_capacity(defaults.len() + custom.len());
    for (key, value) in defaults {
        // generated values are plain ASCII
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(key.header_name(), value);
        }
    }
    merge_headers(&mut headers, custom);
    headers
}

/// `generate_headers` with the thread-local RNG
pub fn default_headers(custom: &HeaderMap) -> HeaderMap {
    generate_headers(custom, &mut rand::thread_rng())
}

/// Overlay `overrides` onto `base`; names present in `overrides` win
pub fn merge_headers(base: &mut HeaderMap, overrides: &HeaderMap) {
    for name in overrides.keys() {
        base.remove(name);
        for value in overrides.get_all(name) {
            base.append(name.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};

    fn value<'a>(headers: &'a HeaderMap, key: HeaderKey) -> &'a str {
        headers.get(key.header_name()).unwrap().to_str().unwrap()
    }

    #[test]
    fn test_default_profile_is_consistent() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let headers = generate_headers(&HeaderMap::new(), &mut rng);
            assert_eq!(headers.len(), 9);
            assert_eq!(value(&headers, HeaderKey::Accept), FORM_URLENCODED);
            assert_eq!(value(&headers, HeaderKey::SecChUaMobile), "?0");
            assert_eq!(value(&headers, HeaderKey::SecFetchSite), "same-site");

            let ua = value(&headers, HeaderKey::UserAgent);
            assert!(PLATFORMS.iter().any(|p| ua.contains(p)), "{ua}");

            let hint = value(&headers, HeaderKey::SecChUaPlatform).trim_matches('"');
            assert!(CLIENT_HINT_PLATFORMS.contains(&hint));

            let major: u16 = ua
                .split("Chrome/")
                .nth(1)
                .and_then(|rest| rest.split('.').next())
                .unwrap()
                .parse()
                .unwrap();
            assert!(CHROME_MAJORS.contains(&major));
            assert!(value(&headers, HeaderKey::SecChUa).contains(&format!("v=\"{major}\"")));
        }
    }

    #[test]
    fn test_custom_headers_override_and_append() {
        let mut custom = HeaderMap::new();
        custom.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        custom.insert(AUTHORIZATION, HeaderValue::from_static("Bearer token"));

        let headers = default_headers(&custom);
        assert_eq!(headers.len(), 10);
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[AUTHORIZATION], "Bearer token");
        assert!(headers.contains_key(USER_AGENT));
    }

    #[test]
    fn test_merge_replaces_every_value() {
        let mut base = HeaderMap::new();
        base.append("x-tag", HeaderValue::from_static("a"));
        base.append("x-tag", HeaderValue::from_static("b"));

        let mut overrides = HeaderMap::new();
        overrides.insert("x-tag", HeaderValue::from_static("c"));

        merge_headers(&mut base, &overrides);
        let values: Vec<_> = base.get_all("x-tag").iter().collect();
        assert_eq!(values, vec![&HeaderValue::from_static("c")]);
    }
}
