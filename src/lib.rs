// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # requests-rs - HTTP requests from argument lists
//!
//! Issue GET/POST/any-method requests by passing a list of typed arguments
//! instead of building a request field by field.
//!
//! ## Features
//!
//! - Headers, query params, form fields, uploads, basic auth, raw and JSON
//!   bodies in a single argument list, in any order
//! - Query params merged into the URL's existing query string
//! - Automatic body encoding: multipart, urlencoded, raw or JSON
//! - Sessions with a persistent cookie jar
//! - Lazy, cached response bodies with gzip support, JSON and dot-path views
//! - Debug dumps of requests and responses through `tracing`
//!
//! ## Example
//!
//! ```rust,no_run
//! use requests::{args, Data, Files, Header, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut resp = requests::get(
//!         "http://httpbin.org/get?x=1",
//!         args![Header::from([("accept", "application/json")])],
//!     )
//!     .await?;
//!     println!("{}", resp.text().await?);
//!
//!     let mut session = Session::new()?;
//!     let mut resp = session
//!         .post(
//!             "http://httpbin.org/post",
//!             args![
//!                 Data::from([("name", "a")]),
//!                 Files::from([("upload", "/tmp/f.txt")]),
//!             ],
//!         )
//!         .await?;
//!     let query = resp.query().await?;
//!     println!("{:?}", query.str("form.name"));
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;

// Errors
pub use error::{Error, Result};

// Arguments
pub use http::{Arg, Auth, Data, Files, Header, Params};

// Session and dispatch
pub use http::{get, post, post_json, send, Session, SessionConfig};

// Cookies and responses
pub use http::{Cookie, CookieJar, JsonQuery, Response};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
