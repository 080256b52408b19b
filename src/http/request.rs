// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Argument classification and request assembly

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, COOKIE};
use reqwest::Method;
use url::Url;

use super::args::{Arg, Data, Files, Header, Params};
use super::body::{encode_body, Body, BodyParts};
use super::query::build_url;
use crate::error::{Error, Result};

/// Arguments grouped by what they contribute to the request.
///
/// Headers and auth are not here: they are written into the header map as
/// soon as they are seen.
#[derive(Debug, Default)]
pub struct Buckets {
    pub params: Vec<Params>,
    pub data: Vec<Data>,
    pub files: Vec<Files>,
    /// Last raw body argument
    pub raw: Option<String>,
    /// Last JSON body argument
    pub json: Option<serde_json::Value>,
}

/// Sort `args` into buckets, applying headers and auth to `headers` in order.
///
/// Any `Cookie` header in `headers` is removed first; cookies come from the
/// session's jar only.
pub fn classify(args: Vec<Arg>, headers: &mut HeaderMap) -> Buckets {
    headers.remove(COOKIE);

    let mut buckets = Buckets::default();
    for arg in args {
        match arg {
            Arg::Header(header) => apply_headers(headers, &header),
            Arg::Params(params) => buckets.params.push(params),
            Arg::Data(data) => buckets.data.push(data),
            Arg::Files(files) => buckets.files.push(files),
            Arg::Auth(auth) => match HeaderValue::from_str(&auth.header_value()) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("Basic auth credentials are not a valid header value"),
            },
            Arg::Raw(body) => buckets.raw = Some(body),
            Arg::Json(value) => buckets.json = Some(value),
            Arg::Skip => {}
        }
    }
    buckets
}

/// Set every entry of `header`, overwriting existing values
pub fn apply_headers(headers: &mut HeaderMap, header: &Header) {
    for (name, value) in header.iter() {
        match (
            HeaderName::try_from(name),
            HeaderValue::try_from(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(name, "Skipping invalid header"),
        }
    }
}

/// Parse a method name; blank fails, case is normalized
pub fn parse_method(method: &str) -> Result<Method> {
    let method = method.trim();
    if method.is_empty() {
        return Err(Error::EmptyMethod);
    }
    Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| Error::InvalidMethod(method.to_string()))
}

/// A request ready for the transport
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Body,
}

impl Request {
    /// Build a request from a method, URL and arguments.
    ///
    /// `headers` are the starting headers (the session defaults); runs the
    /// classifier, then the URL builder, then the body encoder.
    pub async fn prepare(
        method: &str,
        url: &str,
        args: Vec<Arg>,
        mut headers: HeaderMap,
    ) -> Result<Self> {
        let method = parse_method(method)?;
        let buckets = classify(args, &mut headers);
        let url = build_url(url, &buckets.params)?;
        let body = encode_body(
            &method,
            BodyParts {
                data: &buckets.data,
                files: &buckets.files,
                raw: buckets.raw.as_deref(),
                json: buckets.json.as_ref(),
            },
            &mut headers,
        )
        .await?;

        Ok(Self {
            method,
            url,
            headers,
            body,
        })
    }

    /// Request line as it appears on the wire, e.g. `GET /a?b=c HTTP/1.1`
    pub fn request_line(&self) -> String {
        let mut target = self.url.path().to_string();
        if let Some(query) = self.url.query() {
            target.push('?');
            target.push_str(query);
        }
        format!("{} {} HTTP/1.1", self.method, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::args::Auth;

    #[test]
    fn test_header_last_write_wins() {
        let mut headers = HeaderMap::new();
        classify(
            vec![
                Header::from([("x-token", "first"), ("x-other", "o")]).into(),
                Header::from([("x-token", "second")]).into(),
                Header::from([("X-Token", "third")]).into(),
            ],
            &mut headers,
        );
        assert_eq!(headers["x-token"], "third");
        assert_eq!(headers["x-other"], "o");
    }

    #[test]
    fn test_cookie_header_removed() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("stale=1"));
        classify(Vec::new(), &mut headers);
        assert!(headers.get(COOKIE).is_none());
    }

    #[test]
    fn test_auth_sets_basic_header() {
        let mut headers = HeaderMap::new();
        classify(vec![Auth::new("user", "pass").into()], &mut headers);
        assert_eq!(headers[AUTHORIZATION], "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_buckets() {
        let mut headers = HeaderMap::new();
        let buckets = classify(
            vec![
                Params::from([("a", "1")]).into(),
                Data::from([("b", "2")]).into(),
                Params::from([("c", "3")]).into(),
                Files::from([("f", "/tmp/x")]).into(),
                Arg::Skip,
                "raw".into(),
                serde_json::json!({"k": "v"}).into(),
            ],
            &mut headers,
        );
        assert_eq!(buckets.params.len(), 2);
        assert_eq!(buckets.data.len(), 1);
        assert_eq!(buckets.files.len(), 1);
        assert_eq!(buckets.raw.as_deref(), Some("raw"));
        assert!(buckets.json.is_some());
        assert!(headers.is_empty());
    }

    #[test]
    fn test_invalid_header_skipped() {
        let mut headers = HeaderMap::new();
        classify(
            vec![Header::from([("bad header", "v"), ("x-ok", "1")]).into()],
            &mut headers,
        );
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("Put").unwrap(), Method::PUT);
        assert_eq!(parse_method(" get ").unwrap(), Method::GET);
        assert!(matches!(parse_method("   "), Err(Error::EmptyMethod)));
        assert!(matches!(parse_method("GE T"), Err(Error::InvalidMethod(_))));
    }

    #[tokio::test]
    async fn test_prepare_get_with_params() {
        let req = Request::prepare(
            "GET",
            "http://example.test/search?x=1",
            vec![Params::from([("y", "2")]).into()],
            HeaderMap::new(),
        )
        .await
        .unwrap();
        assert_eq!(req.url.query(), Some("x=1&y=2"));
        assert_eq!(req.request_line(), "GET /search?x=1&y=2 HTTP/1.1");
        assert!(req.body.is_empty());
    }

    #[tokio::test]
    async fn test_prepare_rejects_bad_input() {
        let err = Request::prepare("", "http://example.test", Vec::new(), HeaderMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyMethod));

        let err = Request::prepare("GET", "not a url", Vec::new(), HeaderMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Url(_)));
    }
}
