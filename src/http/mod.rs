// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer
//!
//! Argument classification, URL and body building, cookie handling and the
//! session that dispatches requests through reqwest.

mod args;
mod body;
mod client;
mod cookie;
mod dump;
mod json;
mod query;
mod request;
mod response;

pub use args::{Arg, Auth, Data, Files, Header, Params};
pub use body::{encode_body, encode_form, Body, BodyParts};
pub use client::{get, post, post_json, send, Session, SessionConfig};
pub use cookie::{Cookie, CookieJar};
pub use json::JsonQuery;
pub use query::{build_url, merge_params};
pub use request::{apply_headers, classify, parse_method, Buckets, Request};
pub use response::Response;

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("requests-rs/", env!("CARGO_PKG_VERSION"));

/// Content types set by the body encoder
pub mod mime {
    pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
    pub const JSON: &str = "application/json";
    pub const MULTIPART: &str = "multipart/form-data";
    pub const OCTET_STREAM: &str = "application/octet-stream";
}
