// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request body encoding
//!
//! Exactly one encoding is chosen per dispatch, in this order: multipart
//! (any file present), raw string, JSON (not for GET), urlencoded form
//! fields, empty.

use std::path::Path;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::Method;

use super::args::{Data, Files};
use super::mime;
use crate::error::{Error, Result};

/// Encoded request body
pub enum Body {
    /// No body
    Empty,
    /// `application/x-www-form-urlencoded` fields
    Form(Bytes),
    /// Caller supplied bytes, sent verbatim
    Raw(Bytes),
    /// Serialized JSON
    Json(Bytes),
    /// `multipart/form-data` with file and text parts
    Multipart(Form),
}

impl Body {
    /// Short name of the encoding, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Body::Empty => "empty",
            Body::Form(_) => "form",
            Body::Raw(_) => "raw",
            Body::Json(_) => "json",
            Body::Multipart(_) => "multipart",
        }
    }

    /// Payload bytes when the body is buffered
    pub fn bytes(&self) -> Option<&Bytes> {
        match self {
            Body::Form(b) | Body::Raw(b) | Body::Json(b) => Some(b),
            Body::Empty | Body::Multipart(_) => None,
        }
    }

    /// Content length; multipart length is computed by the transport
    pub fn content_length(&self) -> Option<u64> {
        match self {
            Body::Empty => Some(0),
            Body::Multipart(_) => None,
            _ => self.bytes().map(|b| b.len() as u64),
        }
    }

    /// Content type this encoding produces, if it sets one
    pub fn content_type(&self) -> Option<String> {
        match self {
            Body::Form(_) => Some(mime::FORM_URLENCODED.to_string()),
            Body::Json(_) => Some(mime::JSON.to_string()),
            Body::Multipart(form) => {
                Some(format!("{}; boundary={}", mime::MULTIPART, form.boundary()))
            }
            Body::Empty | Body::Raw(_) => None,
        }
    }

    /// Check if the body is empty
    pub fn is_empty(&self) -> bool {
        self.content_length() == Some(0)
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Body")
            .field("kind", &self.kind())
            .field("content_length", &self.content_length())
            .finish()
    }
}

/// Body-relevant argument buckets
#[derive(Debug, Default)]
pub struct BodyParts<'a> {
    pub data: &'a [Data],
    pub files: &'a [Files],
    pub raw: Option<&'a str>,
    pub json: Option<&'a serde_json::Value>,
}

/// Pick and build the body encoding, setting `Content-Type` on `headers`.
///
/// Multipart always overwrites the content type because the boundary must
/// match. Form and JSON only fill it in when the caller did not set one.
pub async fn encode_body(
    method: &Method,
    parts: BodyParts<'_>,
    headers: &mut HeaderMap,
) -> Result<Body> {
    if parts.files.iter().any(|f| !f.is_empty()) {
        let body = Body::Multipart(build_multipart(parts.files, parts.data).await?);
        if let Some(value) = body
            .content_type()
            .and_then(|ct| HeaderValue::from_str(&ct).ok())
        {
            headers.insert(CONTENT_TYPE, value);
        }
        return Ok(body);
    }

    if let Some(raw) = parts.raw {
        return Ok(Body::Raw(Bytes::copy_from_slice(raw.as_bytes())));
    }

    if let Some(value) = parts.json {
        if *method != Method::GET {
            let encoded = serde_json::to_vec(value).map_err(Error::Encoding)?;
            headers
                .entry(CONTENT_TYPE)
                .or_insert(HeaderValue::from_static(mime::JSON));
            return Ok(Body::Json(Bytes::from(encoded)));
        }
        tracing::debug!("Ignoring JSON body on GET request");
    }

    if parts.data.iter().any(|d| !d.is_empty()) {
        headers
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static(mime::FORM_URLENCODED));
        return Ok(Body::Form(Bytes::from(encode_form(parts.data))));
    }

    Ok(Body::Empty)
}

/// Urlencode every field of every map, sorted by key
pub fn encode_form(data: &[Data]) -> String {
    let mut pairs: Vec<(&str, &str)> = data.iter().flat_map(|d| d.iter()).collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

async fn build_multipart(files: &[Files], data: &[Data]) -> Result<Form> {
    let mut form = Form::new();

    for map in files {
        for (field, path) in map.iter() {
            let contents = tokio::fs::read(path)
                .await
                .map_err(|e| Error::file_open(path, e))?;
            let file_name = Path::new(path)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string());

            tracing::debug!(field, path, size = contents.len(), "Adding upload part");

            let part = Part::bytes(contents)
                .file_name(file_name)
                .mime_str(mime::OCTET_STREAM)?;
            form = form.part(field.to_string(), part);
        }
    }

    for map in data {
        for (key, value) in map.iter() {
            form = form.text(key.to_string(), value.to_string());
        }
    }

    Ok(form)
}
