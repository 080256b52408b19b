// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Ad hoc field extraction from JSON bodies

use serde_json::Value;

use crate::error::{Error, Result};

/// Parsed JSON body with dot-path lookups
///
/// Paths are dot separated keys; numeric segments index arrays, `#` on an
/// array yields its length, and `\.` matches a literal dot inside a key.
///
/// ```
/// use requests::JsonQuery;
///
/// let q = JsonQuery::parse(r#"{"user": {"tags": ["a", "b"], "v1.2": true}}"#).unwrap();
/// assert_eq!(q.str("user.tags.1"), Some("b"));
/// assert_eq!(q.i64("user.tags.#"), Some(2));
/// assert_eq!(q.bool(r"user.v1\.2"), Some(true));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JsonQuery {
    root: Value,
}

impl JsonQuery {
    /// Parse JSON text
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map(|root| Self { root })
            .map_err(Error::Decode)
    }

    /// Root value
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Look up a value; `None` when any segment is missing
    pub fn get(&self, path: &str) -> Option<Value> {
        let segments = split_path(path);
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => return Some(self.root.clone()),
        };

        let mut current = &self.root;
        for segment in parents {
            current = step(current, segment)?;
        }

        match (current, last.as_str()) {
            (Value::Array(items), "#") => Some(Value::from(items.len())),
            (value, segment) => step(value, segment).cloned(),
        }
    }

    /// Check if a path resolves
    pub fn exists(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// String at path
    pub fn str(&self, path: &str) -> Option<&str> {
        let segments = split_path(path);
        let mut current = &self.root;
        for segment in &segments {
            current = step(current, segment)?;
        }
        current.as_str()
    }

    /// Integer at path (also array length via `#`)
    pub fn i64(&self, path: &str) -> Option<i64> {
        self.get(path).and_then(|v| v.as_i64())
    }

    /// Float at path
    pub fn f64(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(|v| v.as_f64())
    }

    /// Boolean at path
    pub fn bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(|v| v.as_bool())
    }
}

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn split_path(path: &str) -> Vec<String> {
    if path.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            '.' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}
