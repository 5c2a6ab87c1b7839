//! Prefix autocomplete.
//!
//! Merges a synthetic "run the full query" suggestion with backend-ranked
//! term suggestions. The synthetic suggestion is always first and always
//! present for non-empty input; backend failure degrades to returning it
//! alone rather than surfacing an error mid-keystroke.

use std::sync::Arc;
use std::time::Duration;

use easyeats_core::Suggestion;

use crate::backend::SearchBackend;

/// Maximum number of backend-derived suggestions per request; one synthetic
/// query suggestion comes on top.
pub const DEFAULT_SUGGESTION_LIMIT: i32 = 8;

/// Autocomplete engine over a search backend.
pub struct SuggestionEngine {
    backend: Arc<dyn SearchBackend>,
    limit: i32,
    timeout: Duration,
}

impl SuggestionEngine {
    /// Create an engine with the default backend-suggestion cap.
    pub fn new(backend: Arc<dyn SearchBackend>, timeout: Duration) -> Self {
        Self {
            backend,
            limit: DEFAULT_SUGGESTION_LIMIT,
            timeout,
        }
    }

    /// Override the backend-suggestion cap.
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = limit;
        self
    }

    /// Suggestions for a raw input string.
    ///
    /// - empty/whitespace input yields an empty list (no synthetic either)
    /// - the synthetic `kind=query` suggestion equals the trimmed input
    ///   verbatim and is always first
    /// - backend suggestions are deduplicated case-insensitively against
    ///   the synthetic term and against each other
    /// - backend failure or timeout degrades to the synthetic suggestion
    pub async fn suggest(&self, raw_text: &str) -> Vec<Suggestion> {
        let trimmed = raw_text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let fetched =
            match tokio::time::timeout(self.timeout, self.backend.suggest(trimmed, self.limit))
                .await
            {
                Ok(Ok(suggestions)) => suggestions,
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "suggestion backend failed, returning query suggestion only");
                    Vec::new()
                }
                Err(_) => {
                    tracing::warn!("suggestion backend timed out, returning query suggestion only");
                    Vec::new()
                }
            };

        let mut seen: Vec<String> = vec![trimmed.to_lowercase()];
        let mut merged = vec![Suggestion::query(trimmed)];

        for suggestion in fetched.into_iter().take(self.limit as usize) {
            let key = suggestion.term.to_lowercase();
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            merged.push(suggestion);
        }

        merged
    }
}
