// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session: configuration, cookie state and request dispatch

use std::time::{Duration, Instant};

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT_ENCODING, CONTENT_TYPE, COOKIE, SET_COOKIE,
    USER_AGENT,
};
use reqwest::redirect::Policy;
use reqwest::Client;
use url::Url;

use super::args::Arg;
use super::body::Body;
use super::cookie::{Cookie, CookieJar};
use super::dump;
use super::mime;
use super::request::Request;
use super::response::Response;
use super::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// User agent string
    pub user_agent: String,
    /// Overall per-request timeout
    pub timeout: Option<Duration>,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Accept invalid certificates (dangerous!)
    pub accept_invalid_certs: bool,
    /// Proxy URL
    pub proxy: Option<String>,
    /// Log request and response dumps
    pub debug: bool,
    /// Headers sent with every request
    pub default_headers: HeaderMap,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            max_redirects: 10,
            accept_invalid_certs: false,
            proxy: None,
            debug: false,
            default_headers: HeaderMap::new(),
        }
    }
}

impl SessionConfig {
    /// Create a new session config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set max redirects
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Route through a proxy; certificate checks are relaxed with it
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self.accept_invalid_certs = true;
        self
    }

    /// Enable debug dumps
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Add default header
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.default_headers.insert(name, value);
        }
        self
    }
}

/// A sequence of requests sharing headers, configuration and cookies.
///
/// Every dispatch starts from the session headers; headers, params and bodies
/// passed to one call never carry over to the next. Cookies do: they live in
/// the session's [`CookieJar`].
///
/// ```rust,no_run
/// use requests::{args, Auth, Params, Session};
///
/// # async fn run() -> requests::Result<()> {
/// let mut session = Session::new()?;
/// let mut resp = session
///     .get(
///         "http://example.test/search?x=1",
///         args![Params::from([("y", "2")]), Auth::new("user", "pass")],
///     )
///     .await?;
/// println!("{}", resp.text().await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Session {
    client: Client,
    config: SessionConfig,
    headers: HeaderMap,
    cookie_jar: CookieJar,
    /// Cookies staged by the caller, moved into the jar on the next dispatch
    pending_cookies: Vec<Cookie>,
}

impl Session {
    /// Create a new session with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(SessionConfig::default())
    }

    /// Create a new session with custom configuration
    pub fn with_config(config: SessionConfig) -> Result<Self> {
        let client = build_client(&config)?;

        let mut headers = config.default_headers.clone();
        if !headers.contains_key(USER_AGENT) {
            let agent = HeaderValue::try_from(config.user_agent.as_str())
                .map_err(|e| Error::config(format!("Invalid user agent: {}", e)))?;
            headers.insert(USER_AGENT, agent);
        }

        Ok(Self {
            client,
            config,
            headers,
            cookie_jar: CookieJar::new(),
            pending_cookies: Vec::new(),
        })
    }

    /// Get session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Headers sent with every request
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Set a header on every following request
    pub fn set_header(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<()> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::config(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::config(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Get the cookie jar
    pub fn cookie_jar(&self) -> &CookieJar {
        &self.cookie_jar
    }

    /// Cookies staged but not yet moved into the jar
    pub fn pending_cookies(&self) -> &[Cookie] {
        &self.pending_cookies
    }

    /// Set the overall per-request timeout
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.config.timeout = Some(timeout);
    }

    /// Route requests through `proxy_url`. Certificate verification is
    /// relaxed so intercepting proxies work.
    pub fn set_proxy(&mut self, proxy_url: &str) -> Result<()> {
        let config = self.config.clone().proxy(proxy_url);
        self.client = build_client(&config)?;
        self.config = config;
        tracing::debug!(proxy = proxy_url, "Proxy configured");
        Ok(())
    }

    /// Toggle request/response dumps
    pub fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;
    }

    /// Stage a cookie for the next request
    pub fn set_cookie(&mut self, cookie: Cookie) {
        self.pending_cookies.push(cookie);
    }

    /// Drop staged cookies. Cookies already in the jar are kept.
    pub fn clear_cookies(&mut self) {
        self.pending_cookies.clear();
    }

    /// Execute a GET request
    pub async fn get(
        &mut self,
        url: &str,
        args: impl IntoIterator<Item = Arg>,
    ) -> Result<Response> {
        self.send("GET", url, args).await
    }

    /// Execute a POST request
    pub async fn post(
        &mut self,
        url: &str,
        args: impl IntoIterator<Item = Arg>,
    ) -> Result<Response> {
        self.send("POST", url, args).await
    }

    /// Execute a POST request with `Content-Type: application/json` unless
    /// a header argument says otherwise.
    ///
    /// Form fields are sent as one JSON object when no raw, JSON or file
    /// argument supplies the body.
    pub async fn post_json(
        &mut self,
        url: &str,
        args: impl IntoIterator<Item = Arg>,
    ) -> Result<Response> {
        let mut headers = self.headers.clone();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(mime::JSON));
        let args = data_as_json(args.into_iter().collect());
        let request = Request::prepare("POST", url, args, headers).await?;
        self.execute(request).await
    }

    /// Execute a request with any method
    pub async fn send(
        &mut self,
        method: &str,
        url: &str,
        args: impl IntoIterator<Item = Arg>,
    ) -> Result<Response> {
        let request =
            Request::prepare(method, url, args.into_iter().collect(), self.headers.clone()).await?;
        self.execute(request).await
    }

    /// Move staged cookies into the jar, scoped to `url`
    fn sync_cookies(&mut self, url: &Url) {
        if self.pending_cookies.is_empty() {
            return;
        }
        tracing::debug!(count = self.pending_cookies.len(), url = %url, "Storing staged cookies");
        self.cookie_jar
            .set_cookies(url, self.pending_cookies.drain(..));
    }

    /// Send a prepared request
    pub async fn execute(&mut self, request: Request) -> Result<Response> {
        self.sync_cookies(&request.url);

        if self.config.debug {
            let cookies = self.cookie_jar.get_cookies(&request.url);
            tracing::info!("Request dump\n{}", dump::request(&request, &cookies));
        }

        let Request {
            method,
            url,
            mut headers,
            body,
        } = request;

        if let Some(jar_cookies) = self.cookie_jar.get_cookie_header(&url) {
            let value = match headers.get(COOKIE).and_then(|v| v.to_str().ok()) {
                Some(existing) => format!("{}; {}", existing, jar_cookies),
                None => jar_cookies,
            };
            if let Ok(value) = HeaderValue::try_from(value) {
                headers.insert(COOKIE, value);
            }
        }

        let accepts_encoding = headers.contains_key(ACCEPT_ENCODING);

        tracing::debug!(method = %method, url = %url, body = body.kind(), "Sending request");

        let mut builder = self.client.request(method, url.clone());
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        builder = match body {
            Body::Empty => builder.headers(headers),
            Body::Multipart(form) => {
                // reqwest appends its own Content-Type for multipart
                headers.remove(CONTENT_TYPE);
                builder.headers(headers).multipart(form)
            }
            Body::Form(bytes) | Body::Raw(bytes) | Body::Json(bytes) => {
                builder.headers(headers).body(bytes)
            }
        };

        let start = Instant::now();
        let response = builder.send().await?;
        let elapsed = start.elapsed();

        for cookie in response.headers().get_all(SET_COOKIE) {
            if let Ok(cookie_str) = cookie.to_str() {
                self.cookie_jar.add_from_header(cookie_str, response.url());
            }
        }

        let response = Response::new(
            response,
            url,
            accepts_encoding,
            elapsed,
            self.cookie_jar.clone(),
        );

        tracing::debug!(
            status = response.status_code(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Received response"
        );
        if self.config.debug {
            tracing::info!("Response dump\n{}", dump::response(&response));
        }

        Ok(response)
    }
}

/// Fold every `Data` map into a single `Arg::Json` object, unless another
/// argument already decides the body. Later maps win on repeated keys.
fn data_as_json(args: Vec<Arg>) -> Vec<Arg> {
    let has_body = args.iter().any(|arg| match arg {
        Arg::Raw(_) | Arg::Json(_) => true,
        Arg::Files(files) => !files.is_empty(),
        _ => false,
    });
    if has_body {
        return args;
    }

    let mut object = serde_json::Map::new();
    let mut rest = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Arg::Data(data) => {
                for (key, value) in data.iter() {
                    object.insert(key.to_string(), serde_json::Value::from(value));
                }
            }
            other => rest.push(other),
        }
    }
    if !object.is_empty() {
        rest.push(Arg::Json(serde_json::Value::Object(object)));
    }
    rest
}

fn build_client(config: &SessionConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .redirect(Policy::limited(config.max_redirects))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .cookie_store(false) // the session's jar handles cookies
        .no_gzip() // Response::content() decompresses
        .no_brotli();

    if let Some(ref proxy_url) = config.proxy {
        builder = builder.proxy(
            reqwest::Proxy::all(proxy_url)
                .map_err(|e| Error::config(format!("Invalid proxy URL: {}", e)))?,
        );
    }

    Ok(builder.build()?)
}

/// GET with a fresh session
pub async fn get(url: &str, args: impl IntoIterator<Item = Arg>) -> Result<Response> {
    Session::new()?.get(url, args).await
}

/// POST with a fresh session
pub async fn post(url: &str, args: impl IntoIterator<Item = Arg>) -> Result<Response> {
    Session::new()?.post(url, args).await
}

/// JSON POST with a fresh session
pub async fn post_json(url: &str, args: impl IntoIterator<Item = Arg>) -> Result<Response> {
    Session::new()?.post_json(url, args).await
}

/// Any method with a fresh session
pub async fn send(
    method: &str,
    url: &str,
    args: impl IntoIterator<Item = Arg>,
) -> Result<Response> {
    Session::new()?.send(method, url, args).await
}
