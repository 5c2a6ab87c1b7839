//! Interactive query controller.
//!
//! Front-ends (web client, TUI, anything keystroke-driven) funnel input
//! through this controller instead of calling the orchestrator directly.
//! It applies the interaction discipline the engine itself stays out of:
//! suggestion fetches are debounced and sequence-guarded, search
//! submissions are latest-wins, and a stale response is dropped rather
//! than overwriting newer display state.

use std::sync::Arc;
use std::time::Duration;

use easyeats_core::Suggestion;

use crate::orchestrator::{RawSearchParams, SearchOrchestrator, SearchOutcome};
use crate::sequence::{Debouncer, RequestSequence};
use crate::suggest::SuggestionEngine;

pub struct QueryController {
    orchestrator: Arc<SearchOrchestrator>,
    suggestions: Arc<SuggestionEngine>,
    suggest_debounce: Debouncer,
    search_sequence: RequestSequence,
}

impl QueryController {
    /// `debounce_delay` is the pause after the last keystroke before a
    /// suggestion request is issued (configured default 200ms).
    pub fn new(
        orchestrator: Arc<SearchOrchestrator>,
        suggestions: Arc<SuggestionEngine>,
        debounce_delay: Duration,
    ) -> Self {
        Self {
            orchestrator,
            suggestions,
            suggest_debounce: Debouncer::new(debounce_delay),
            search_sequence: RequestSequence::new(),
        }
    }

    /// Handle one keystroke's worth of input.
    ///
    /// Returns the suggestions to display, or None when this input was
    /// superseded by a newer keystroke - either during the debounce delay
    /// or while the fetch was in flight. A None result must leave the
    /// current display untouched.
    pub async fn on_input(&self, text: &str) -> Option<Vec<Suggestion>> {
        let text = text.to_string();
        self.suggest_debounce
            .run(|| async move { self.suggestions.suggest(&text).await })
            .await
    }

    /// Submit a full search.
    ///
    /// The most recently submitted search wins: an earlier in-flight
    /// submission still runs to completion, but its outcome is discarded
    /// here and must not be rendered.
    pub async fn submit(&self, params: RawSearchParams) -> Option<SearchOutcome> {
        let token = self.search_sequence.issue();
        let outcome = self.orchestrator.search(params).await;
        self.search_sequence.accept(token, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, SearchBackend, SuggestionSeed};
    use crate::error::BackendResult;
    use async_trait::async_trait;
    use easyeats_core::{Query, SearchResult, SuggestionKind};
    use tokio::time::sleep;

    fn controller_with_backend(backend: Arc<dyn SearchBackend>) -> Arc<QueryController> {
        let orchestrator = Arc::new(SearchOrchestrator::new(
            backend.clone(),
            Duration::from_secs(5),
        ));
        let suggestions = Arc::new(SuggestionEngine::new(backend, Duration::from_secs(5)));
        Arc::new(QueryController::new(
            orchestrator,
            suggestions,
            Duration::from_millis(200),
        ))
    }

    /// Backend whose suggest call is slow for short prefixes only, to model
    /// an older response arriving after a newer request's response.
    struct SlowSuggest;

    #[async_trait]
    impl SearchBackend for SlowSuggest {
        async fn search(&self, _query: &Query) -> BackendResult<Vec<SearchResult>> {
            Ok(Vec::new())
        }

        async fn suggest(&self, prefix: &str, _limit: i32) -> BackendResult<Vec<Suggestion>> {
            if prefix == "be" {
                sleep(Duration::from_millis(500)).await;
            }
            Ok(vec![Suggestion {
                id: 1,
                term: format!("{} olives", prefix),
                kind: SuggestionKind::Dish,
                restaurant: None,
            }])
        }

        async fn health_check(&self) -> BackendResult<bool> {
            Ok(true)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_suggestion_response_does_not_overwrite_newer() {
        // The "be" fetch goes out first but resolves after the "beef"
        // fetch; its late response must be discarded, not displayed.
        let controller = controller_with_backend(Arc::new(SlowSuggest));

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.on_input("be").await })
        };

        // Second keystroke after the first fetch is already in flight.
        sleep(Duration::from_millis(250)).await;
        let second = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.on_input("beef").await })
        };

        let applied = second.await.unwrap().expect("latest input must be applied");
        assert_eq!(applied[0].term, "beef");
        assert_eq!(applied[0].kind, SuggestionKind::Query);
        assert_eq!(applied[1].term, "beef olives");

        assert_eq!(first.await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_input_is_applied_after_debounce() {
        let backend = Arc::new(MemoryBackend::new());
        backend.insert_suggestion(SuggestionSeed {
            id: 1,
            term: "pizza margherita".to_string(),
            kind: SuggestionKind::Dish,
            popularity: 10,
            restaurant: None,
        });
        let controller = controller_with_backend(backend);

        let applied = controller.on_input("pizza").await.unwrap();

        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0].term, "pizza");
        assert_eq!(applied[1].term, "pizza margherita");
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_search_submission_wins() {
        /// Search takes longer for the first query than the second.
        struct VariableDelay;

        #[async_trait]
        impl SearchBackend for VariableDelay {
            async fn search(&self, query: &Query) -> BackendResult<Vec<SearchResult>> {
                if query.text == "slow" {
                    sleep(Duration::from_millis(400)).await;
                }
                Ok(Vec::new())
            }

            async fn suggest(&self, _prefix: &str, _limit: i32) -> BackendResult<Vec<Suggestion>> {
                Ok(Vec::new())
            }

            async fn health_check(&self) -> BackendResult<bool> {
                Ok(true)
            }
        }

        let controller = controller_with_backend(Arc::new(VariableDelay));

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller
                    .submit(RawSearchParams {
                        q: Some("slow".to_string()),
                        ..Default::default()
                    })
                    .await
            })
        };

        sleep(Duration::from_millis(50)).await;
        let second = {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller
                    .submit(RawSearchParams {
                        q: Some("fast".to_string()),
                        ..Default::default()
                    })
                    .await
            })
        };

        assert!(first.await.unwrap().is_none());

        let applied = second.await.unwrap().expect("latest submission must win");
        assert_eq!(applied.query.text, "fast");
    }
}
