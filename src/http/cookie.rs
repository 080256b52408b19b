// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie store shared by every dispatch of a session
//!
//! Cookies are kept per (domain, path). The jar is filled from cookies staged
//! with `Session::set_cookie` and from `Set-Cookie` response headers, and is
//! the only source of the outgoing `Cookie` header.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use url::Url;

/// A single HTTP cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain the cookie belongs to (empty = host of the URL it is stored for)
    pub domain: String,
    /// Path the cookie is valid for
    pub path: String,
    /// Expiration time (None = session cookie)
    pub expires: Option<DateTime<Utc>>,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// HttpOnly flag
    pub http_only: bool,
}

impl Cookie {
    /// Create a new cookie
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: "/".to_string(),
            expires: None,
            secure: false,
            http_only: false,
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

    /// Set expiration time
    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Check if the cookie is expired
    pub fn is_expired(&self) -> bool {
        self.expires.map_or(false, |exp| exp < Utc::now())
    }

    /// Check if the cookie should be sent to the given URL
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
        let domain = self.domain.trim_start_matches('.');
        if domain.is_empty() {
            return false;
        }
        host.eq_ignore_ascii_case(domain) || host.ends_with(&format!(".{}", domain))
    }

    /// Fill in domain and path from the URL the cookie is stored for
    fn scope_to(mut self, url: &Url) -> Self {
        if self.domain.is_empty() {
            self.domain = url.host_str().unwrap_or("").to_string();
        }
        if self.path.is_empty() {
            self.path = default_path(url);
        }
        self
    }

    /// Parse a Set-Cookie header value
    pub fn parse(header: &str, url: &Url) -> Option<Self> {
        let mut parts = header.split(';');
        let first = parts.next()?.trim();

        let (name, value) = first.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let mut cookie = Cookie::new(name, value.trim().trim_matches('"'));
        cookie.domain = url.host_str().unwrap_or("").to_string();
        cookie.path = default_path(url);

        for part in parts {
            let part = part.trim();
            if let Some((attr, val)) = part.split_once('=') {
                let val = val.trim();
                match attr.trim().to_lowercase().as_str() {
                    "domain" if !val.is_empty() => {
                        cookie.domain = val.trim_start_matches('.').to_lowercase()
                    }
                    "path" if val.starts_with('/') => cookie.path = val.to_string(),
                    "expires" => {
                        if let Ok(dt) = DateTime::parse_from_rfc2822(val) {
                            cookie.expires = Some(dt.with_timezone(&Utc));
                        }
                    }
                    "max-age" => {
                        if let Ok(secs) = val.parse::<i64>() {
                            cookie.expires = Some(Utc::now() + chrono::Duration::seconds(secs));
                        }
                    }
                    _ => {}
                }
            } else {
                match part.to_lowercase().as_str() {
                    "secure" => cookie.secure = true,
                    "httponly" => cookie.http_only = true,
                    _ => {}
                }
            }
        }

        Some(cookie)
    }

    /// Convert to cookie header format
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

impl std::fmt::Display for Cookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if !self.domain.is_empty() {
            write!(f, "; Domain={}", self.domain)?;
        }
        write!(f, "; Path={}", self.path)?;
        if let Some(expires) = self.expires {
            write!(f, "; Expires={}", expires.to_rfc2822())?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        Ok(())
    }
}

/// Directory of the URL path, as used for cookies without a Path attribute
fn default_path(url: &Url) -> String {
    let path = url.path();
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(i) => path[..i].to_string(),
    }
}

/// Storage key: (domain, path)
type CookieKey = (String, String);

/// Thread-safe cookie storage
#[derive(Debug, Clone)]
pub struct CookieJar {
    cookies: Arc<DashMap<CookieKey, Vec<Cookie>>>,
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

    /// Add a cookie, replacing one with the same name, domain and path.
    /// A cookie without a domain is dropped; use [`CookieJar::set_cookies`].
    pub fn add(&self, cookie: Cookie) {
        if cookie.domain.is_empty() {
            tracing::warn!(name = %cookie.name, "Dropping cookie without domain");
            return;
        }
        let key = (cookie.domain.to_lowercase(), cookie.path.clone());
        let mut entry = self.cookies.entry(key).or_default();
        entry.retain(|c| c.name != cookie.name);
        if !cookie.is_expired() {
            entry.push(cookie);
        }
    }

    /// Store cookies on behalf of `url`, defaulting domain and path from it
    pub fn set_cookies(&self, url: &Url, cookies: impl IntoIterator<Item = Cookie>) {
        for cookie in cookies {
            self.add(cookie.scope_to(url));
        }
    }

    /// Add a cookie from a Set-Cookie header
    pub fn add_from_header(&self, header: &str, url: &Url) {
        match Cookie::parse(header, url) {
            Some(cookie) => self.add(cookie),
            None => tracing::debug!(header, "Ignoring malformed Set-Cookie"),
        }
    }

    /// Get all cookies for a URL, longest path first
    pub fn get_cookies(&self, url: &Url) -> Vec<Cookie> {
        self.remove_expired();

        let mut result: Vec<Cookie> = self
            .cookies
            .iter()
            .flat_map(|entry| {
                entry
                    .value()
                    .iter()
                    .filter(|c| c.matches(url))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        result.sort_by(|a, b| b.path.len().cmp(&a.path.len()).then(a.name.cmp(&b.name)));
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

    /// Clear all cookies
    pub fn clear(&self) {
        self.cookies.clear();
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

    /// Export all cookies as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        let all_cookies: Vec<Cookie> = self
            .cookies
            .iter()
            .flat_map(|e| e.value().clone())
            .collect();
        serde_json::to_string(&all_cookies)
    }

    /// Import cookies from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let cookies: Vec<Cookie> = serde_json::from_str(json)?;
        let jar = CookieJar::new();
        for cookie in cookies {
            jar.add(cookie);
        }
        Ok(jar)
    }
}
