// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response facade
//!
//! The body is read from the transport the first time it is needed and kept
//! afterwards, so `content()`, `text()`, `json()` and `save_to_file()` can be
//! called in any order and any number of times.

use std::io::Read;
use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use flate2::read::GzDecoder;
use reqwest::header::{HeaderMap, CONTENT_ENCODING};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use url::Url;

use super::cookie::{Cookie, CookieJar};
use super::json::JsonQuery;
use crate::error::{Error, Result};

/// Where the body is in its lifecycle
#[derive(Debug)]
enum BodyState {
    /// Not read yet
    Pending(reqwest::Response),
    /// Read and decoded
    Read(Bytes),
    /// Reading or decoding failed; the transport body is consumed
    Failed(String),
}

/// HTTP response representation
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    /// Final URL (after redirects)
    url: Url,
    /// URL the request was sent to
    request_url: Url,
    elapsed: Duration,
    content_length: Option<u64>,
    /// Whether the request carried `Accept-Encoding`
    accepts_encoding: bool,
    cookie_jar: CookieJar,
    body: BodyState,
    text: Option<String>,
}

impl Response {
    pub(crate) fn new(
        response: reqwest::Response,
        request_url: Url,
        accepts_encoding: bool,
        elapsed: Duration,
        cookie_jar: CookieJar,
    ) -> Self {
        Self {
            status: response.status(),
            headers: response.headers().clone(),
            url: response.url().clone(),
            request_url,
            elapsed,
            content_length: response.content_length(),
            accepts_encoding,
            cookie_jar,
            body: BodyState::Pending(response),
            text: None,
        }
    }

    /// Response status
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get status code as u16
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Final URL after redirects
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Wall-clock time spent in the transport call
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Body length: the advertised `Content-Length`, or the size of the
    /// decoded content once it has been read
    pub fn len(&self) -> Option<u64> {
        match &self.body {
            BodyState::Read(content) => Some(content.len() as u64),
            _ => self.content_length,
        }
    }

    /// Check if the body is known to be empty
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    fn is_gzip(&self) -> bool {
        self.accepts_encoding
            && self
                .headers
                .get(CONTENT_ENCODING)
                .and_then(|v| v.to_str().ok())
                .map_or(false, |v| v.trim().eq_ignore_ascii_case("gzip"))
    }

    /// Raw body bytes, gunzipped when the server sent gzip.
    ///
    /// The transport is read only on the first call. If that read fails,
    /// every later call fails with [`Error::BodyUnavailable`].
    pub async fn content(&mut self) -> Result<&Bytes> {
        if matches!(self.body, BodyState::Pending(_)) {
            let gzip = self.is_gzip();
            let interrupted = BodyState::Failed("body read was interrupted".to_string());
            if let BodyState::Pending(response) = std::mem::replace(&mut self.body, interrupted) {
                match read_body(response, gzip).await {
                    Ok(content) => {
                        tracing::debug!(url = %self.url, size = content.len(), "Read response body");
                        self.body = BodyState::Read(content);
                    }
                    Err(e) => {
                        tracing::warn!(url = %self.url, error = %e, "Failed to read response body");
                        self.body = BodyState::Failed(e.to_string());
                        return Err(e);
                    }
                }
            }
        }

        match &self.body {
            BodyState::Read(content) => Ok(content),
            BodyState::Failed(reason) => Err(Error::BodyUnavailable(reason.clone())),
            BodyState::Pending(_) => Err(Error::BodyUnavailable("body was not read".to_string())),
        }
    }

    /// Body as text (invalid UTF-8 is replaced)
    pub async fn text(&mut self) -> Result<&str> {
        if self.text.is_none() {
            let text = String::from_utf8_lossy(self.content().await?).into_owned();
            self.text = Some(text);
        }
        Ok(self.text.get_or_insert_with(String::new).as_str())
    }

    /// Deserialize the body as JSON
    pub async fn json<T: DeserializeOwned>(&mut self) -> Result<T> {
        let content = self.content().await?;
        serde_json::from_slice(content).map_err(Error::Decode)
    }

    /// Body as a generic JSON object
    pub async fn json_map(&mut self) -> Result<serde_json::Map<String, serde_json::Value>> {
        self.json().await
    }

    /// Body as a queryable JSON tree
    pub async fn query(&mut self) -> Result<JsonQuery> {
        let text = self.text().await?;
        JsonQuery::parse(text)
    }

    /// Write the body to `path`, creating or truncating it
    pub async fn save_to_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = self.content().await?.clone();

        let mut file = tokio::fs::File::create(path).await?;
        file.write_all(&content).await?;
        file.sync_all().await?;

        tracing::debug!(path = %path.display(), size = content.len(), "Saved response body");
        Ok(())
    }

    /// Cookies the session holds for the request URL
    pub fn cookies(&self) -> Vec<Cookie> {
        self.cookie_jar.get_cookies(&self.request_url)
    }
}

async fn read_body(response: reqwest::Response, gzip: bool) -> Result<Bytes> {
    let raw = response.bytes().await?;
    decode_body(raw, gzip)
}

/// Gunzip `raw` when `gzip` is set
pub(crate) fn decode_body(raw: Bytes, gzip: bool) -> Result<Bytes> {
    if !gzip {
        return Ok(raw);
    }
    let mut decoded = Vec::new();
    GzDecoder::new(raw.as_ref())
        .read_to_end(&mut decoded)
        .map_err(Error::Decompress)?;
    Ok(Bytes::from(decoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_decode_plain() {
        let raw = Bytes::from_static(b"hello");
        assert_eq!(decode_body(raw.clone(), false).unwrap(), raw);
    }

    #[test]
    fn test_decode_gzip() {
        let raw = Bytes::from(gzip(b"compressed body"));
        assert_eq!(decode_body(raw, true).unwrap().as_ref(), b"compressed body");
    }

    async fn fetch(server: &MockServer, args: Vec<crate::Arg>) -> Response {
        crate::get(&server.uri(), args).await.unwrap()
    }

    #[tokio::test]
    async fn test_content_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("payload"))
            .mount(&server)
            .await;

        let mut resp = fetch(&server, Vec::new()).await;
        assert_eq!(resp.len(), Some(7));
        let first = resp.content().await.unwrap().clone();
        let second = resp.content().await.unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(first.as_ref(), b"payload");
        assert_eq!(resp.text().await.unwrap(), "payload");
        assert_eq!(resp.text().await.unwrap(), "payload");
    }

    #[tokio::test]
    async fn test_gzip_body_with_accept_encoding() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-encoding", "gzip")
                    .set_body_bytes(gzip(br#"{"zipped": true}"#)),
            )
            .mount(&server)
            .await;

        let mut resp = fetch(
            &server,
            crate::args![crate::Header::from([("accept-encoding", "gzip")])],
        )
        .await;
        let map = resp.json_map().await.unwrap();
        assert_eq!(map["zipped"], serde_json::Value::Bool(true));
        assert_eq!(resp.len(), Some(16));
    }

    #[tokio::test]
    async fn test_gzip_left_alone_without_accept_encoding() {
        let server = MockServer::start().await;
        let zipped = gzip(b"raw");
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-encoding", "gzip")
                    .set_body_bytes(zipped.clone()),
            )
            .mount(&server)
            .await;

        let mut resp = fetch(&server, Vec::new()).await;
        assert_eq!(resp.content().await.unwrap().as_ref(), zipped.as_slice());
    }

    #[tokio::test]
    async fn test_json_views() {
        #[derive(serde::Deserialize)]
        struct Echo {
            name: String,
        }

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"name": "lzh"}"#))
            .mount(&server)
            .await;

        let mut resp = fetch(&server, Vec::new()).await;
        let echo: Echo = resp.json().await.unwrap();
        assert_eq!(echo.name, "lzh");
        assert_eq!(resp.query().await.unwrap().str("name"), Some("lzh"));
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let mut resp = fetch(&server, Vec::new()).await;
        let err = resp.json::<serde_json::Value>().await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert_eq!(resp.text().await.unwrap(), "<html>");
    }

    #[tokio::test]
    async fn test_save_to_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8, 1, 2, 255]))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("body.bin");
        let mut resp = fetch(&server, Vec::new()).await;
        resp.save_to_file(&target).await.unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), vec![0u8, 1, 2, 255]);

        let err = resp
            .save_to_file(dir.path().join("missing/dir/body.bin"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn test_corrupt_gzip_error_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-encoding", "gzip")
                    .set_body_bytes(b"not gzip at all".to_vec()),
            )
            .mount(&server)
            .await;

        let mut resp = fetch(
            &server,
            crate::args![crate::Header::from([("accept-encoding", "gzip")])],
        )
        .await;
        let first = resp.content().await.unwrap_err();
        assert!(matches!(first, Error::Decompress(_)));

        let second = resp.content().await.unwrap_err();
        match second {
            Error::BodyUnavailable(reason) => assert_eq!(reason, first.to_string()),
            other => panic!("unexpected error: {}", other),
        }
        assert!(resp.text().await.is_err());
    }

    #[tokio::test]
    async fn test_truncated_body_is_not_cached_as_empty() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            // Advertise more bytes than are sent, then hang up
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nshort")
                .await
                .unwrap();
        });

        let mut resp = crate::get(&format!("http://{}/", addr), Vec::new())
            .await
            .unwrap();
        assert_eq!(resp.len(), Some(100));

        let first = resp.content().await.unwrap_err();
        assert!(first.is_transport());

        let second = resp.content().await.unwrap_err();
        assert!(matches!(second, Error::BodyUnavailable(_)));
        assert!(second.is_response_error());
        assert!(resp.json::<serde_json::Value>().await.is_err());
        assert!(resp.save_to_file(std::env::temp_dir().join("never-written")).await.is_err());
        assert_eq!(resp.len(), Some(100));
    }

    #[test]
    fn test_decode_corrupt_gzip() {
        let err = decode_body(Bytes::from_static(b"not gzip at all"), true).unwrap_err();
        assert!(matches!(err, Error::Decompress(_)));
        assert!(err.is_response_error());
    }
}
