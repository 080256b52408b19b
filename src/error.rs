// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for requests
//!
//! Every failure a dispatch can produce is a variant here. Transport errors
//! from reqwest are passed through untouched in [`Error::Http`].

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for request operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for requests
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure (connect, TLS, timeout, redirect loop...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Method was empty after trimming
    #[error("HTTP method must not be empty")]
    EmptyMethod,

    /// Method is not a valid HTTP token
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// Request body could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encoding(#[source] serde_json::Error),

    /// Upload source could not be read
    #[error("Failed to open upload file {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Response body is not valid JSON for the requested view
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Response advertised gzip but the stream is corrupt
    #[error("Failed to decompress response body: {0}")]
    Decompress(#[source] std::io::Error),

    /// An earlier read of the response body failed; the body is gone
    #[error("Response body is unavailable: {0}")]
    BodyUnavailable(String),

    /// Basic auth needs exactly a username and a password
    #[error("Basic auth expects 2 values (username, password), got {got}")]
    InvalidAuth { got: usize },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a file open error
    pub fn file_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileOpen {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Http(e) if e.is_timeout())
    }

    /// Check if this came from the transport layer
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_))
    }

    /// Check if the request could not be built (nothing was sent)
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Error::Url(_)
                | Error::EmptyMethod
                | Error::InvalidMethod(_)
                | Error::Encoding(_)
                | Error::FileOpen { .. }
                | Error::InvalidAuth { .. }
        )
    }

    /// Check if this happened while reading a response
    pub fn is_response_error(&self) -> bool {
        matches!(
            self,
            Error::Decode(_) | Error::Decompress(_) | Error::BodyUnavailable(_)
        )
    }

    /// Get HTTP status code if the transport reported one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_errors() {
        assert!(Error::EmptyMethod.is_request_error());
        assert!(Error::InvalidAuth { got: 1 }.is_request_error());
        assert!(!Error::EmptyMethod.is_transport());
        assert_eq!(Error::EmptyMethod.status_code(), None);
    }

    #[test]
    fn test_file_open_message() {
        let err = Error::file_open(
            "/missing/upload.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().contains("/missing/upload.txt"));
        assert!(err.is_request_error());
    }

    #[test]
    fn test_url_error_conversion() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::Url(_)));
    }
}
