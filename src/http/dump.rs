// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Wire-style dumps for debug mode

use std::fmt::Write;

use reqwest::header::HeaderMap;

use super::cookie::Cookie;
use super::request::Request;
use super::response::Response;

fn write_headers(out: &mut String, headers: &HeaderMap) {
    for (name, value) in headers {
        let value = if value.is_sensitive() {
            "<redacted>"
        } else {
            value.to_str().unwrap_or("<binary>")
        };
        let _ = writeln!(out, "{}: {}", name, value);
    }
}

/// Request line, Host, headers and the jar cookies that will be attached
pub fn request(req: &Request, cookies: &[Cookie]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", req.request_line());
    if let Some(host) = req.url.host_str() {
        match req.url.port() {
            Some(port) => {
                let _ = writeln!(out, "Host: {}:{}", host, port);
            }
            None => {
                let _ = writeln!(out, "Host: {}", host);
            }
        }
    }
    write_headers(&mut out, &req.headers);
    if let Some(len) = req.body.content_length() {
        let _ = writeln!(out, "Content-Length: {}", len);
    }
    if !cookies.is_empty() {
        out.push_str("Cookies:\n");
        for cookie in cookies {
            let _ = writeln!(out, "{}", cookie);
        }
    }
    out
}

/// Status line and headers
pub fn response(resp: &Response) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "HTTP/1.1 {} {}",
        resp.status_code(),
        resp.status().canonical_reason().unwrap_or("")
    );
    write_headers(&mut out, resp.headers());
    out
}
