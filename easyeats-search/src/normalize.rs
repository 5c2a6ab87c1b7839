//! Query normalization.
//!
//! Turns the raw, string-typed values of an HTTP query string into a
//! canonical [`Query`]. This layer never fails: malformed numeric input is
//! silently defaulted rather than rejected, so a garbled `limit=abc` still
//! produces a valid search instead of a 400.

use easyeats_core::Query;

/// Default page size when `limit` is absent or unparseable.
pub const DEFAULT_LIMIT: i32 = 20;

/// Normalize raw request values into a canonical `Query`.
///
/// - `text`: trimmed; empty is valid and means "match all", bounded by filters
/// - `city`: trimmed; empty becomes None
/// - tag lists: each entry trimmed, empties dropped, duplicates dropped
///   preserving first-seen order (backends always receive the same ordered
///   list for the same logical filter)
/// - `limit`: integer parse; failure or non-positive values fall back to 20.
///   No upper bound is enforced here - the ceiling is the backend's concern.
/// - `offset`: integer parse; failure falls back to 0; negatives clamp to 0
pub fn normalize(
    text: Option<&str>,
    city: Option<&str>,
    cuisines: &[String],
    features: &[String],
    limit: Option<&str>,
    offset: Option<&str>,
) -> Query {
    let text = text.unwrap_or("").trim().to_string();

    let city = city
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    let limit = limit
        .and_then(|s| s.trim().parse::<i32>().ok())
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_LIMIT);

    let offset = offset
        .and_then(|s| s.trim().parse::<i32>().ok())
        .unwrap_or(0)
        .max(0);

    Query {
        text,
        city,
        cuisines: dedup_tags(cuisines),
        features: dedup_tags(features),
        limit,
        offset,
    }
}

/// Trim, drop empties, drop duplicates, keep first-seen order.
fn dedup_tags(raw: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        let tag = tag.trim();
        if tag.is_empty() || tags.iter().any(|seen| seen == tag) {
            continue;
        }
        tags.push(tag.to_string());
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_for_empty_input() {
        let query = normalize(None, None, &[], &[], None, None);

        assert_eq!(query.text, "");
        assert_eq!(query.city, None);
        assert!(query.cuisines.is_empty());
        assert!(query.features.is_empty());
        assert_eq!(query.limit, DEFAULT_LIMIT);
        assert_eq!(query.offset, 0);
    }

    #[test]
    fn test_text_and_city_are_trimmed() {
        let query = normalize(Some("  beef stew "), Some("  Valletta  "), &[], &[], None, None);

        assert_eq!(query.text, "beef stew");
        assert_eq!(query.city.as_deref(), Some("Valletta"));
    }

    #[test]
    fn test_blank_city_becomes_none() {
        let query = normalize(None, Some("   "), &[], &[], None, None);
        assert_eq!(query.city, None);
    }

    #[test]
    fn test_tags_deduplicated_first_seen_order() {
        let cuisines = strs(&["italian", " pizza ", "italian", "", "pizza", "sushi"]);
        let query = normalize(None, None, &cuisines, &[], None, None);

        assert_eq!(query.cuisines, strs(&["italian", "pizza", "sushi"]));
    }

    #[test]
    fn test_malformed_limit_defaults() {
        for raw in ["abc", "", "12.5", "NaN", "1e3"] {
            let query = normalize(None, None, &[], &[], Some(raw), None);
            assert_eq!(query.limit, DEFAULT_LIMIT, "limit {:?}", raw);
        }
    }

    #[test]
    fn test_non_positive_limit_falls_back() {
        assert_eq!(normalize(None, None, &[], &[], Some("0"), None).limit, DEFAULT_LIMIT);
        assert_eq!(normalize(None, None, &[], &[], Some("-5"), None).limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_valid_limit_passes_through_uncapped() {
        let query = normalize(None, None, &[], &[], Some("500"), None);
        assert_eq!(query.limit, 500);
    }

    #[test]
    fn test_offset_parsing() {
        assert_eq!(normalize(None, None, &[], &[], None, Some("40")).offset, 40);
        assert_eq!(normalize(None, None, &[], &[], None, Some("-3")).offset, 0);
        assert_eq!(normalize(None, None, &[], &[], None, Some("junk")).offset, 0);
    }

    proptest! {
        /// For all inputs, normalize never panics and always upholds the
        /// Query invariants.
        #[test]
        fn prop_normalize_always_valid(
            text in proptest::option::of(".*"),
            city in proptest::option::of(".*"),
            cuisines in proptest::collection::vec(".*", 0..8),
            features in proptest::collection::vec(".*", 0..8),
            limit in proptest::option::of(".*"),
            offset in proptest::option::of(".*"),
        ) {
            let query = normalize(
                text.as_deref(),
                city.as_deref(),
                &cuisines,
                &features,
                limit.as_deref(),
                offset.as_deref(),
            );

            prop_assert!(query.limit > 0);
            prop_assert!(query.offset >= 0);
            prop_assert_eq!(query.text.trim(), query.text.as_str());
            if let Some(city) = &query.city {
                prop_assert!(!city.is_empty());
                prop_assert_eq!(city.trim(), city.as_str());
            }
            for tags in [&query.cuisines, &query.features] {
                for tag in tags {
                    prop_assert!(!tag.is_empty());
                }
                let unique: std::collections::HashSet<&String> = tags.iter().collect();
                prop_assert_eq!(unique.len(), tags.len());
            }
        }
    }
}
