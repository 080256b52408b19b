// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Typed request arguments
//!
//! A dispatch takes a list of [`Arg`] values. Each variant names what the
//! value means (header, query param, form field, upload, credentials, body),
//! so any mix can be passed to `get`/`post`/`send` in any order.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{Error, Result};

macro_rules! string_map {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name(HashMap<String, String>);

        impl $name {
            /// Create an empty map
            pub fn new() -> Self {
                Self::default()
            }

            /// Add an entry, replacing any previous value for the key
            pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
                self.0.insert(key.into(), value.into());
                self
            }

            /// Get the value for a key
            pub fn get(&self, key: &str) -> Option<&str> {
                self.0.get(key).map(String::as_str)
            }

            /// Iterate over entries
            pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
                self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
            }

            /// Number of entries
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// Check if the map is empty
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for $name {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
            }
        }

        impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for $name {
            fn from(entries: [(K, V); N]) -> Self {
                entries.into_iter().collect()
            }
        }

        impl From<HashMap<String, String>> for $name {
            fn from(map: HashMap<String, String>) -> Self {
                Self(map)
            }
        }

        impl IntoIterator for $name {
            type Item = (String, String);
            type IntoIter = std::collections::hash_map::IntoIter<String, String>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl From<$name> for Arg {
            fn from(map: $name) -> Self {
                Arg::$name(map)
            }
        }
    };
}

string_map!(
    /// Request headers, set (overwriting) per key
    Header
);
string_map!(
    /// Query string parameters, appended to the URL's existing query
    Params
);
string_map!(
    /// Form fields, sent urlencoded or as multipart text parts
    Data
);
string_map!(
    /// File uploads: form field name -> path on disk
    Files
);

/// HTTP Basic credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auth {
    pub username: String,
    pub password: String,
}

impl Auth {
    /// Create credentials
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Build from a sequence of values; anything but exactly two fails
    pub fn from_parts<S: AsRef<str>>(parts: &[S]) -> Result<Self> {
        match parts {
            [user, pass] => Ok(Self::new(user.as_ref(), pass.as_ref())),
            _ => Err(Error::InvalidAuth { got: parts.len() }),
        }
    }

    /// Value for the `Authorization` header
    pub fn header_value(&self) -> String {
        let encoded = base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            format!("{}:{}", self.username, self.password),
        );
        format!("Basic {}", encoded)
    }
}

impl<U: Into<String>, P: Into<String>> From<(U, P)> for Auth {
    fn from((username, password): (U, P)) -> Self {
        Self::new(username, password)
    }
}

impl TryFrom<Vec<String>> for Auth {
    type Error = Error;

    fn try_from(parts: Vec<String>) -> Result<Self> {
        Self::from_parts(&parts)
    }
}

/// One request argument
#[derive(Debug, Clone)]
pub enum Arg {
    /// Headers applied immediately, last write wins
    Header(Header),
    /// Query parameters
    Params(Params),
    /// Form fields
    Data(Data),
    /// File uploads
    Files(Files),
    /// Basic auth credentials
    Auth(Auth),
    /// Body sent verbatim
    Raw(String),
    /// Body sent as JSON
    Json(serde_json::Value),
    /// Accepted and ignored. Lets callers build argument lists with
    /// conditional entries without filtering them out first.
    Skip,
}

impl Arg {
    /// JSON body from any serializable value
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Arg::Json)
            .map_err(Error::Encoding)
    }

    /// Short name of the variant, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Arg::Header(_) => "header",
            Arg::Params(_) => "params",
            Arg::Data(_) => "data",
            Arg::Files(_) => "files",
            Arg::Auth(_) => "auth",
            Arg::Raw(_) => "raw",
            Arg::Json(_) => "json",
            Arg::Skip => "skip",
        }
    }
}

impl From<Auth> for Arg {
    fn from(auth: Auth) -> Self {
        Arg::Auth(auth)
    }
}

impl From<String> for Arg {
    fn from(body: String) -> Self {
        Arg::Raw(body)
    }
}

impl From<&str> for Arg {
    fn from(body: &str) -> Self {
        Arg::Raw(body.to_string())
    }
}

impl From<serde_json::Value> for Arg {
    fn from(value: serde_json::Value) -> Self {
        Arg::Json(value)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(arg: Option<T>) -> Self {
        arg.map(Into::into).unwrap_or(Arg::Skip)
    }
}

/// Build a `Vec<Arg>` from anything convertible into [`Arg`]
///
/// ```
/// use requests::{args, Header, Params};
///
/// let args = args![
///     Header::from([("accept", "application/json")]),
///     Params::from([("page", "2")]),
/// ];
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => { ::std::vec::Vec::<$crate::Arg>::new() };
    ($($arg:expr),+ $(,)?) => {
        vec![$($crate::Arg::from($arg)),+]
    };
}
