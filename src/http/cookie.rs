// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie jar attached to outgoing requests

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::catalog::CookieAttribute;
use crate::config::parse_env_bool;
use crate::error::{Error, Result};

/// A single HTTP cookie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain the cookie belongs to (empty = any host)
    pub domain: String,
    /// Set without a `Domain` attribute; only sent back to that exact host
    #[serde(default)]
    pub host_only: bool,
    /// Path the cookie is valid for
    pub path: String,
    /// Expiration time (None = session cookie)
    pub expires: Option<DateTime<Utc>>,
    /// Max-Age in seconds, as given
    pub max_age: Option<i64>,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// HttpOnly flag
    pub http_only: bool,
    /// SameSite attribute
    pub same_site: SameSite,
    /// Priority attribute
    pub priority: Option<Priority>,
    /// SameParty flag
    pub same_party: bool,
    /// Partitioned (CHIPS) flag
    pub partitioned: bool,
    /// Free-form extension attribute
    pub extension: Option<String>,
}

/// SameSite cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SameSite {
    /// Cookie sent with all requests
    #[default]
    None,
    /// Cookie sent with same-site and top-level navigations
    Lax,
    /// Cookie only sent with same-site requests
    Strict,
}

impl SameSite {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(SameSite::Strict),
            "lax" => Some(SameSite::Lax),
            "none" => Some(SameSite::None),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            SameSite::None => "None",
            SameSite::Lax => "Lax",
            SameSite::Strict => "Strict",
        }
    }
}

/// Priority cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl Cookie {
    /// Create a new cookie
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            host_only: false,
            path: "/".to_string(),
            expires: None,
            max_age: None,
            secure: false,
            http_only: false,
            same_site: SameSite::default(),
            priority: None,
            same_party: false,
            partitioned: false,
            extension: None,
        }
    }

    /// Set the domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set secure flag
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set http_only flag
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Set same_site attribute
    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Set expiration time
    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Apply one typed attribute from its string form.
    ///
    /// Flags accept the usual truthy spellings (`true`, `1`, `yes`, ...).
    pub fn apply_attribute(&mut self, attribute: CookieAttribute, value: &str) -> Result<()> {
        let invalid = || Error::Cookie(format!("invalid {} '{}'", attribute, value));
        match attribute {
            CookieAttribute::Domain => {
                self.domain = value.trim().trim_start_matches('.').to_ascii_lowercase()
            }
            CookieAttribute::Path => self.path = value.trim().to_string(),
            CookieAttribute::Expires => {
                self.expires = Some(parse_timestamp(value.trim()).ok_or_else(invalid)?)
            }
            CookieAttribute::Secure => self.secure = parse_env_bool(value),
            CookieAttribute::HttpOnly => self.http_only = parse_env_bool(value),
            CookieAttribute::SameSite => {
                self.same_site = SameSite::parse(value).ok_or_else(invalid)?
            }
            CookieAttribute::MaxAge => {
                let secs = value.trim().parse::<i64>().map_err(|_| invalid())?;
                self.max_age = Some(secs);
                self.expires = Some(Utc::now() + chrono::Duration::seconds(secs));
            }
            CookieAttribute::Priority => {
                self.priority = Some(Priority::parse(value).ok_or_else(invalid)?)
            }
            CookieAttribute::SameParty => self.same_party = parse_env_bool(value),
            CookieAttribute::Partitioned => self.partitioned = parse_env_bool(value),
            CookieAttribute::Extension => self.extension = Some(value.to_string()),
        }
        Ok(())
    }

    /// Attributes that differ from a fresh cookie, in string form
    pub fn attributes(&self) -> BTreeMap<CookieAttribute, String> {
        let mut attrs = BTreeMap::new();
        if !self.domain.is_empty() {
            attrs.insert(CookieAttribute::Domain, self.domain.clone());
        }
        if self.path != "/" {
            attrs.insert(CookieAttribute::Path, self.path.clone());
        }
        if let Some(expires) = self.expires {
            attrs.insert(CookieAttribute::Expires, expires.to_rfc2822());
        }
        if let Some(max_age) = self.max_age {
            attrs.insert(CookieAttribute::MaxAge, max_age.to_string());
        }
        if self.secure {
            attrs.insert(CookieAttribute::Secure, "true".to_string());
        }
        if self.http_only {
            attrs.insert(CookieAttribute::HttpOnly, "true".to_string());
        }
        if self.same_site != SameSite::None {
            attrs.insert(CookieAttribute::SameSite, self.same_site.as_str().to_string());
        }
        if let Some(priority) = self.priority {
            attrs.insert(CookieAttribute::Priority, priority.as_str().to_string());
        }
        if self.same_party {
            attrs.insert(CookieAttribute::SameParty, "true".to_string());
        }
        if self.partitioned {
            attrs.insert(CookieAttribute::Partitioned, "true".to_string());
        }
        if let Some(ext) = &self.extension {
            attrs.insert(CookieAttribute::Extension, ext.clone());
        }
        attrs
    }

    /// Check if the cookie is expired
    pub fn is_expired(&self) -> bool {
        self.expires.map_or(false, |exp| exp < Utc::now())
    }

    /// Check if the cookie matches the given URL
    pub fn matches(&self, url: &Url) -> bool {
        let host = url.host_str().unwrap_or("");
        if !self.domain_matches(host) {
            return false;
        }

        if !url.path().starts_with(&self.path) {
            return false;
        }

        if self.secure && url.scheme() != "https" {
            return false;
        }

        !self.is_expired()
    }

    fn domain_matches(&self, host: &str) -> bool {
        if self.domain.is_empty() {
            return true;
        }

        let domain = self.domain.trim_start_matches('.');
        if self.host_only {
            return host == domain;
        }
        domain_covers(domain, host)
    }

    /// Parse a Set-Cookie header value received from `url`.
    ///
    /// Returns `None` when the header is malformed or its `Domain` does not
    /// cover the host that sent it.
    pub fn parse(header: &str, url: &Url) -> Option<Self> {
        let mut parts = header.split(';');
        let first = parts.next()?.trim();

        let (name, value) = first.split_once('=')?;
        let host = url.host_str()?.to_ascii_lowercase();
        let mut cookie = Cookie::new(name.trim(), value.trim());
        cookie.domain = host.clone();
        cookie.host_only = true;

        let mut has_domain = false;
        for part in parts {
            let part = part.trim();
            let (attr, val) = part.split_once('=').unwrap_or((part, "true"));
            let attr = match attr.trim().to_ascii_lowercase().as_str() {
                "max-age" => CookieAttribute::MaxAge,
                other => match other.parse::<CookieAttribute>() {
                    Ok(attr) => attr,
                    Err(_) => continue,
                },
            };
            // Malformed attributes are dropped, the cookie itself is kept
            if cookie.apply_attribute(attr, val).is_ok() && attr == CookieAttribute::Domain {
                has_domain = !cookie.domain.is_empty();
            }
        }

        if !has_domain {
            cookie.domain = host;
        } else if domain_covers(&cookie.domain, &host) {
            cookie.host_only = false;
        } else {
            tracing::debug!(
                category = "Cookie",
                name = %cookie.name,
                domain = %cookie.domain,
                host = %host,
                "rejected cookie for foreign domain"
            );
            return None;
        }

        Some(cookie)
    }

    /// Convert to cookie header format
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// `host` is `domain` or one of its subdomains
fn domain_covers(domain: &str, host: &str) -> bool {
    host == domain || host.ends_with(&format!(".{}", domain))
}

/// Thread-safe cookie storage
#[derive(Debug, Clone)]
pub struct CookieJar {
    /// Cookies stored by domain
    cookies: Arc<DashMap<String, Vec<Cookie>>>,
}

impl Default for CookieJar {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieJar {
    /// Create a new empty cookie jar
    pub fn new() -> Self {
        Self {
            cookies: Arc::new(DashMap::new()),
        }
    }

    /// Add a cookie to the jar, replacing one with the same name and path
    pub fn add(&self, cookie: Cookie) {
        let mut entry = self.cookies.entry(cookie.domain.clone()).or_default();
        entry.retain(|c| c.name != cookie.name || c.path != cookie.path);
        entry.push(cookie);
    }

    /// Add a cookie from a Set-Cookie header
    pub fn add_from_header(&self, header: &str, url: &Url) {
        if let Some(cookie) = Cookie::parse(header, url) {
            self.add(cookie);
        }
    }

    /// Get all cookies for a URL
    pub fn get_cookies(&self, url: &Url) -> Vec<Cookie> {
        self.remove_expired();

        let mut result = Vec::new();
        for entry in self.cookies.iter() {
            for cookie in entry.value().iter() {
                if cookie.matches(url) {
                    result.push(cookie.clone());
                }
            }
        }
        result
    }

    /// Get Cookie header value for a URL
    pub fn get_cookie_header(&self, url: &Url) -> Option<String> {
        let cookies = self.get_cookies(url);
        if cookies.is_empty() {
            return None;
        }

        Some(
            cookies
                .iter()
                .map(|c| c.to_header_value())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// First cookie with `name`, on any domain
    pub fn get_by_name(&self, name: &str) -> Option<Cookie> {
        self.cookies
            .iter()
            .find_map(|entry| entry.value().iter().find(|c| c.name == name).cloned())
    }

    /// Remove every cookie called `name`; returns how many went
    pub fn remove_by_name(&self, name: &str) -> usize {
        let mut removed = 0;
        for mut entry in self.cookies.iter_mut() {
            let before = entry.value().len();
            entry.value_mut().retain(|c| c.name != name);
            removed += before - entry.value().len();
        }
        removed
    }

    /// Every stored cookie, sorted by name
    pub fn all(&self) -> Vec<Cookie> {
        let mut cookies: Vec<Cookie> = self
            .cookies
            .iter()
            .flat_map(|e| e.value().clone())
            .collect();
        cookies.sort_by(|a, b| a.name.cmp(&b.name));
        cookies
    }

    fn remove_expired(&self) {
        for mut entry in self.cookies.iter_mut() {
            entry.value_mut().retain(|c| !c.is_expired());
        }
    }

    /// Get total cookie count
    pub fn len(&self) -> usize {
        self.cookies.iter().map(|e| e.value().len()).sum()
    }

    /// Check if jar is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_parsing() {
        let url = Url::parse("https://example.com/path").unwrap();
        let header =
            "session=abc123; Domain=example.com; Path=/; Secure; HttpOnly; Priority=High";
        let cookie = Cookie::parse(header, &url).unwrap();

        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.value, "abc123");
        assert_eq!(cookie.domain, "example.com");
        assert_eq!(cookie.path, "/");
        assert!(cookie.secure);
        assert!(cookie.http_only);
        assert_eq!(cookie.priority, Some(Priority::High));
    }

    #[test]
    fn test_parse_max_age() {
        let url = Url::parse("https://example.com/").unwrap();
        let cookie = Cookie::parse("a=b; Max-Age=60; SameSite=Lax", &url).unwrap();
        assert_eq!(cookie.max_age, Some(60));
        assert!(cookie.expires.is_some());
        assert_eq!(cookie.same_site, SameSite::Lax);
    }

    #[test]
    fn test_apply_attributes() {
        let mut cookie = Cookie::new("session_id", "abc");
        cookie.apply_attribute(CookieAttribute::Domain, ".example.com").unwrap();
        cookie.apply_attribute(CookieAttribute::Secure, "yes").unwrap();
        cookie.apply_attribute(CookieAttribute::SameSite, "strict").unwrap();
        cookie
            .apply_attribute(CookieAttribute::Expires, "2030-01-01T00:00:00Z")
            .unwrap();
        cookie.apply_attribute(CookieAttribute::Extension, "x=1").unwrap();

        let attrs = cookie.attributes();
        assert_eq!(attrs[&CookieAttribute::Domain], "example.com");
        assert_eq!(attrs[&CookieAttribute::Secure], "true");
        assert_eq!(attrs[&CookieAttribute::SameSite], "Strict");
        assert_eq!(attrs[&CookieAttribute::Extension], "x=1");
        assert!(attrs.contains_key(&CookieAttribute::Expires));
        assert!(!attrs.contains_key(&CookieAttribute::HttpOnly));
    }

    #[test]
    fn test_invalid_attribute_values() {
        let mut cookie = Cookie::new("a", "b");
        assert!(matches!(
            cookie.apply_attribute(CookieAttribute::SameSite, "sometimes"),
            Err(Error::Cookie(_))
        ));
        assert!(cookie.apply_attribute(CookieAttribute::MaxAge, "soon").is_err());
        assert!(cookie.apply_attribute(CookieAttribute::Expires, "tomorrow").is_err());
        assert_eq!(cookie, Cookie::new("a", "b"));
    }

    #[test]
    fn test_cookie_jar() {
        let jar = CookieJar::new();
        let url = Url::parse("https://example.com/path").unwrap();

        jar.add(Cookie::new("test", "value").domain("example.com"));
        jar.add(Cookie::new("test", "newer").domain("example.com"));
        assert_eq!(jar.len(), 1);

        let cookies = jar.get_cookies(&url);
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].value, "newer");

        let other = Url::parse("https://other.org/").unwrap();
        assert!(jar.get_cookie_header(&other).is_none());
    }

    #[test]
    fn test_foreign_domain_is_rejected() {
        let jar = CookieJar::new();
        let evil = Url::parse("https://evil.example.org/").unwrap();
        let bank = Url::parse("https://bank.example.com/account").unwrap();

        jar.add_from_header("session_id=attacker; Domain=bank.example.com; Path=/", &evil);
        assert!(jar.is_empty());
        assert!(jar.get_cookie_header(&bank).is_none());

        // a parent domain of the sender is fine
        let login = Url::parse("https://login.example.com/").unwrap();
        jar.add_from_header("sso=1; Domain=.Example.com", &login);
        assert_eq!(jar.get_cookie_header(&bank).as_deref(), Some("sso=1"));
    }

    #[test]
    fn test_host_only_cookie() {
        let jar = CookieJar::new();
        let url = Url::parse("https://example.com/").unwrap();
        jar.add_from_header("pref=dark", &url);

        let cookie = jar.get_by_name("pref").unwrap();
        assert!(cookie.host_only);
        assert_eq!(cookie.domain, "example.com");
        assert_eq!(jar.get_cookie_header(&url).as_deref(), Some("pref=dark"));

        let sub = Url::parse("https://api.example.com/").unwrap();
        assert!(jar.get_cookie_header(&sub).is_none());

        let explicit = Cookie::parse("pref=dark; Domain=example.com", &url).unwrap();
        assert!(!explicit.host_only);
        assert!(explicit.matches(&sub));
    }

    #[test]
    fn test_jar_name_helpers() {
        let jar = CookieJar::new();
        jar.add(Cookie::new("b", "2"));
        jar.add(Cookie::new("a", "1").domain("example.com"));

        assert_eq!(jar.get_by_name("a").unwrap().value, "1");
        let names: Vec<_> = jar.all().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["a", "b"]);

        assert_eq!(jar.remove_by_name("a"), 1);
        assert_eq!(jar.remove_by_name("a"), 0);
        assert!(jar.get_by_name("a").is_none());
        assert_eq!(jar.len(), 1);
    }

    #[test]
    fn test_expired_cookies_are_dropped() {
        let jar = CookieJar::new();
        let url = Url::parse("https://example.com/").unwrap();
        jar.add(Cookie::new("old", "x").expires(Utc::now() - chrono::Duration::seconds(5)));
        assert!(jar.get_cookie_header(&url).is_none());
        assert!(jar.is_empty());
    }
}
