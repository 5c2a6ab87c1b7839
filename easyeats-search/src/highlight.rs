//! Deterministic highlight snippets.
//!
//! Used when the active backend returns a hit without its own highlight:
//! candidate fields are tried in a fixed priority order (description, name,
//! cuisines, features), the first case-insensitive substring match wins, and
//! a 32-character window on each side of the match becomes the snippet.
//!
//! Everything is HTML-escaped before the matched span is wrapped in
//! `<mark>`. That escaping is a security invariant - field text is
//! user-supplied and the snippet is served to browsers verbatim.

use easyeats_core::{HighlightSource, SearchResult};

/// Characters of context kept on each side of the matched span.
pub const WINDOW_CHARS: usize = 32;

/// A built snippet plus the field it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub snippet: String,
    pub source: HighlightSource,
}

/// Escape `&`, `<`, `>`, `"` and `'` for safe embedding in HTML.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Candidate fields for a hit, in the contract's priority order:
/// description, name, cuisines (joined ", "), features (joined ", ").
pub fn result_candidates(result: &SearchResult) -> Vec<(String, HighlightSource)> {
    let mut candidates = Vec::with_capacity(4);
    if let Some(description) = &result.description {
        candidates.push((description.clone(), HighlightSource::Description));
    }
    candidates.push((result.name.clone(), HighlightSource::Name));
    if !result.cuisines.is_empty() {
        candidates.push((result.cuisines.join(", "), HighlightSource::Cuisines));
    }
    if !result.features.is_empty() {
        candidates.push((result.features.join(", "), HighlightSource::Features));
    }
    candidates
}

/// Build a highlight for the first candidate containing `query_text`.
///
/// Returns None when the query is empty or nothing matches. Later
/// candidates are not tried once one matches.
pub fn build_highlight(
    query_text: &str,
    candidates: &[(String, HighlightSource)],
) -> Option<Highlight> {
    let needle = query_text.trim();
    if needle.is_empty() {
        return None;
    }

    for (text, source) in candidates {
        if let Some((start, end)) = find_case_insensitive(text, needle) {
            return Some(build_snippet(text, start, end, *source));
        }
    }

    None
}

fn build_snippet(text: &str, start: usize, end: usize, source: HighlightSource) -> Highlight {
    let window_start = back_chars(text, start, WINDOW_CHARS);
    let window_end = forward_chars(text, end, WINDOW_CHARS);

    // Escape the three pieces independently, then mark only the match.
    let before = escape_html(&text[window_start..start]);
    let matched = escape_html(&text[start..end]);
    let after = escape_html(&text[end..window_end]);

    let prefix = if window_start > 0 { "..." } else { "" };
    let suffix = if window_end < text.len() { "..." } else { "" };

    Highlight {
        snippet: format!("{prefix}{before}<mark>{matched}</mark>{after}{suffix}"),
        source,
    }
}

/// Byte range of the first case-insensitive occurrence of `needle` in
/// `haystack`, matching one haystack character per needle character.
pub(crate) fn find_case_insensitive(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    let needle_chars: Vec<char> = needle.chars().collect();

    for (start, _) in haystack.char_indices() {
        let mut rest = haystack[start..].char_indices();
        let mut consumed = 0usize;
        let mut matched = true;

        for &expected in &needle_chars {
            match rest.next() {
                Some((offset, found)) if chars_eq_ci(found, expected) => {
                    consumed = offset + found.len_utf8();
                }
                _ => {
                    matched = false;
                    break;
                }
            }
        }

        if matched {
            return Some((start, start + consumed));
        }
    }

    None
}

fn chars_eq_ci(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Step back up to `n` characters from byte index `from`, staying on a
/// char boundary.
fn back_chars(text: &str, from: usize, n: usize) -> usize {
    let mut idx = from;
    for _ in 0..n {
        match text[..idx].char_indices().next_back() {
            Some((boundary, _)) => idx = boundary,
            None => break,
        }
    }
    idx
}

/// Step forward up to `n` characters from byte index `from`.
fn forward_chars(text: &str, from: usize, n: usize) -> usize {
    let mut end = from;
    for (offset, c) in text[from..].char_indices().take(n) {
        end = from + offset + c.len_utf8();
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn candidate(text: &str, source: HighlightSource) -> (String, HighlightSource) {
        (text.to_string(), source)
    }

    #[test]
    fn test_short_field_has_no_truncation_markers() {
        let built = build_highlight(
            "brunch",
            &[candidate(
                "Great brunch spot, cosy atmosphere",
                HighlightSource::Description,
            )],
        )
        .unwrap();

        assert_eq!(
            built.snippet,
            "Great <mark>brunch</mark> spot, cosy atmosphere"
        );
        assert_eq!(built.source, HighlightSource::Description);
    }

    #[test]
    fn test_description_wins_over_name() {
        let built = build_highlight(
            "beef",
            &[
                candidate("Slow-cooked beef stew", HighlightSource::Description),
                candidate("Beef House", HighlightSource::Name),
            ],
        )
        .unwrap();

        assert_eq!(built.source, HighlightSource::Description);
    }

    #[test]
    fn test_falls_through_to_later_candidates() {
        let built = build_highlight(
            "sushi",
            &[
                candidate("Fresh fish daily", HighlightSource::Description),
                candidate("Umi", HighlightSource::Name),
                candidate("sushi, japanese", HighlightSource::Cuisines),
            ],
        )
        .unwrap();

        assert_eq!(built.source, HighlightSource::Cuisines);
        assert_eq!(built.snippet, "<mark>sushi</mark>, japanese");
    }

    #[test]
    fn test_script_tags_are_escaped() {
        let built = build_highlight(
            "beef",
            &[candidate("<script>beef</script>", HighlightSource::Description)],
        )
        .unwrap();

        assert_eq!(
            built.snippet,
            "&lt;script&gt;<mark>beef</mark>&lt;/script&gt;"
        );
        assert!(!built.snippet.contains("<script>"));
    }

    #[test]
    fn test_long_field_is_windowed_with_markers() {
        let text = format!("{}needle{}", "a".repeat(100), "b".repeat(100));
        let built = build_highlight(
            "needle",
            &[candidate(&text, HighlightSource::Description)],
        )
        .unwrap();

        assert_eq!(
            built.snippet,
            format!(
                "...{}<mark>needle</mark>{}...",
                "a".repeat(WINDOW_CHARS),
                "b".repeat(WINDOW_CHARS)
            )
        );
    }

    #[test]
    fn test_match_keeps_original_casing() {
        let built = build_highlight(
            "brunch",
            &[candidate("BRUNCH all weekend", HighlightSource::Name)],
        )
        .unwrap();

        assert_eq!(built.snippet, "<mark>BRUNCH</mark> all weekend");
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        let built = build_highlight(
            "café",
            &[candidate(
                "Ħal Qormi's finest little Café, great éclairs too",
                HighlightSource::Description,
            )],
        )
        .unwrap();

        assert!(built.snippet.contains("<mark>Café</mark>"));
    }

    #[test]
    fn test_empty_query_yields_none() {
        assert_eq!(
            build_highlight("", &[candidate("anything", HighlightSource::Name)]),
            None
        );
        assert_eq!(
            build_highlight("   ", &[candidate("anything", HighlightSource::Name)]),
            None
        );
    }

    #[test]
    fn test_no_match_yields_none() {
        assert_eq!(
            build_highlight("ramen", &[candidate("Pizza place", HighlightSource::Name)]),
            None
        );
    }

    #[test]
    fn test_escape_html_covers_all_specials() {
        assert_eq!(
            escape_html(r#"&<>"'"#),
            "&amp;&lt;&gt;&quot;&#39;"
        );
    }

    proptest! {
        /// Outside the <mark> wrapper, snippets never contain raw angle
        /// brackets or quotes regardless of field content.
        #[test]
        fn prop_snippet_is_html_safe(
            text in ".{1,200}",
            needle in "[a-zA-Z]{1,10}",
        ) {
            if let Some(built) = build_highlight(
                &needle,
                &[(text.clone(), HighlightSource::Description)],
            ) {
                let stripped = built
                    .snippet
                    .replacen("<mark>", "", 1)
                    .replacen("</mark>", "", 1);
                prop_assert!(!stripped.contains('<'));
                prop_assert!(!stripped.contains('>'));
                prop_assert!(!stripped.contains('"'));
                prop_assert!(!stripped.contains('\''));
            }
        }
    }
}
