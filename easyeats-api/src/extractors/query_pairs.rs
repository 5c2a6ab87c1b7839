//! Raw query-string extractor.
//!
//! Axum's typed `Query` extractor rejects requests whose parameters fail to
//! deserialize, but the search contract is the opposite: malformed numeric
//! input is silently defaulted by the normalizer, never answered with a 400.
//! Repeated keys (`cuisines=a&cuisines=b`) must also accumulate. This
//! extractor hands routes the decoded key/value pairs untyped and lets the
//! normalizer decide what they mean.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Decoded query-string pairs in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    /// Parse an application/x-www-form-urlencoded query string.
    pub fn parse(query: &str) -> Self {
        let pairs = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();
        Self(pairs)
    }

    /// First value for `key`, if any.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values for `key`, in request order.
    pub fn all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }
}

/// Decode one form-urlencoded component. Undecodable input is kept as-is
/// rather than rejected; downstream normalization treats it like any other
/// string.
fn decode_component(raw: &str) -> String {
    let plus_decoded = raw.replace('+', " ");
    match urlencoding::decode(&plus_decoded) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => plus_decoded,
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for QueryPairs
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::parse(parts.uri.query().unwrap_or("")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_keys_accumulate() {
        let pairs = QueryPairs::parse("q=beef&cuisines=maltese&cuisines=grill&limit=10");

        assert_eq!(pairs.first("q"), Some("beef"));
        assert_eq!(pairs.all("cuisines"), vec!["maltese", "grill"]);
        assert_eq!(pairs.first("limit"), Some("10"));
    }

    #[test]
    fn test_percent_and_plus_decoding() {
        let pairs = QueryPairs::parse("q=beef+stew&city=St.%20Julian%27s");

        assert_eq!(pairs.first("q"), Some("beef stew"));
        assert_eq!(pairs.first("city"), Some("St. Julian's"));
    }

    #[test]
    fn test_plus_inside_percent_encoding_survives() {
        let pairs = QueryPairs::parse("q=a%2Bb");
        assert_eq!(pairs.first("q"), Some("a+b"));
    }

    #[test]
    fn test_valueless_and_empty_pairs() {
        let pairs = QueryPairs::parse("q&&city=");

        assert_eq!(pairs.first("q"), Some(""));
        assert_eq!(pairs.first("city"), Some(""));
        assert_eq!(pairs.first("missing"), None);
        assert!(pairs.all("missing").is_empty());
    }

    #[test]
    fn test_malformed_input_never_panics() {
        for raw in ["%", "%zz=1", "a=%e0%80", "=orphan", "&&&"] {
            let _ = QueryPairs::parse(raw);
        }
    }
}
