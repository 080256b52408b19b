// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Query string merging

use url::Url;

use super::args::Params;
use crate::error::Result;

/// Parse `base` and append every entry of `params` to its query string.
///
/// Existing pairs are kept and new ones are added after them, so repeated
/// keys are preserved. Only the query component changes. When there is
/// nothing left in the query the URL carries no `?`.
pub fn build_url(base: &str, params: &[Params]) -> Result<Url> {
    let mut url = Url::parse(base)?;
    merge_params(&mut url, params);
    Ok(url)
}

/// Append `params` to an already parsed URL
pub fn merge_params(url: &mut Url, params: &[Params]) {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    for param in params {
        pairs.extend(param.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    }

    if pairs.is_empty() {
        url.set_query(None);
        return;
    }

    // Sorted by key like a canonical query encoding; values for the same key
    // keep their insertion order.
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    url.query_pairs_mut().clear().extend_pairs(pairs);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_params_added_to_existing_query() {
        let url = build_url(
            "http://example.test/search?x=1",
            &[Params::from([("y", "2")])],
        )
        .unwrap();
        let pairs = pairs(&url);
        assert!(pairs.contains(&("x".into(), "1".into())));
        assert!(pairs.contains(&("y".into(), "2".into())));
        assert_eq!(url.path(), "/search");
    }

    #[test]
    fn test_repeated_keys_are_kept() {
        let url = build_url(
            "https://example.test/a?k=1&k=2",
            &[Params::from([("k", "3")]), Params::from([("k", "4")])],
        )
        .unwrap();
        let values: Vec<_> = pairs(&url).into_iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_other_components_preserved() {
        let url = build_url(
            "https://user@example.test:8443/p/q?a=1#frag",
            &[Params::from([("b", "x y")])],
        )
        .unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("example.test"));
        assert_eq!(url.port(), Some(8443));
        assert_eq!(url.path(), "/p/q");
        assert_eq!(url.fragment(), Some("frag"));
        assert_eq!(url.query(), Some("a=1&b=x+y"));
    }

    #[test]
    fn test_no_params_no_question_mark() {
        let url = build_url("http://example.test/path?", &[]).unwrap();
        assert_eq!(url.as_str(), "http://example.test/path");

        let url = build_url("http://example.test/path", &[Params::new()]).unwrap();
        assert_eq!(url.as_str(), "http://example.test/path");
    }

    #[test]
    fn test_malformed_url() {
        assert!(matches!(
            build_url("://nope", &[]),
            Err(crate::Error::Url(_))
        ));
    }
}
