//! Search orchestrator.
//!
//! Composes the pipeline: normalize the raw request, call the configured
//! backend under a deadline, fill in highlights the backend didn't supply,
//! and return a stable outcome. Backend faults become an empty result set
//! plus an error indicator - callers distinguish "no results" from "search
//! temporarily unavailable", and nothing here ever panics or re-sorts.

use std::sync::Arc;
use std::time::{Duration, Instant};

use easyeats_core::{Query, SearchResult};

use crate::backend::SearchBackend;
use crate::error::{BackendResult, SearchError};
use crate::highlight::{build_highlight, result_candidates};
use crate::normalize::normalize;

/// Raw, untrusted request values as they arrive from the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct RawSearchParams {
    pub q: Option<String>,
    pub city: Option<String>,
    pub cuisines: Vec<String>,
    pub features: Vec<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Outcome of one search call.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The normalized query that was executed.
    pub query: Query,
    /// Ranked hits in backend order. Empty on backend failure.
    pub results: Vec<SearchResult>,
    /// Set when the backend was unavailable or timed out. An empty result
    /// set with `error == None` genuinely means "no results".
    pub error: Option<SearchError>,
}

/// Orchestrates normalizer, backend, and highlight builder.
///
/// Construction is explicit dependency injection: the backend and timeout
/// are fixed at startup and immutable afterwards, safe for concurrent use
/// by any number of simultaneous requests.
pub struct SearchOrchestrator {
    backend: Arc<dyn SearchBackend>,
    timeout: Duration,
}

impl SearchOrchestrator {
    pub fn new(backend: Arc<dyn SearchBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Run a search for raw request values.
    pub async fn search(&self, params: RawSearchParams) -> SearchOutcome {
        let query = normalize(
            params.q.as_deref(),
            params.city.as_deref(),
            &params.cuisines,
            &params.features,
            params.limit.as_deref(),
            params.offset.as_deref(),
        );

        let started = Instant::now();
        match tokio::time::timeout(self.timeout, self.backend.search(&query)).await {
            Ok(Ok(mut results)) => {
                fill_highlights(&query.text, &mut results);
                SearchOutcome {
                    query,
                    results,
                    error: None,
                }
            }
            Ok(Err(err)) => {
                tracing::error!(error = %err, "search backend error");
                SearchOutcome {
                    query,
                    results: Vec::new(),
                    error: Some(err),
                }
            }
            Err(_) => {
                let elapsed = started.elapsed();
                tracing::error!(?elapsed, "search backend timed out");
                SearchOutcome {
                    query,
                    results: Vec::new(),
                    error: Some(SearchError::Timeout { elapsed }),
                }
            }
        }
    }

    /// Probe backend readiness under the same deadline as searches.
    pub async fn health_check(&self) -> BackendResult<bool> {
        match tokio::time::timeout(self.timeout, self.backend.health_check()).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout {
                elapsed: self.timeout,
            }),
        }
    }
}

/// Fill missing highlights from each hit's own denormalized fields,
/// leaving adapter-returned ordering and existing highlights untouched.
fn fill_highlights(query_text: &str, results: &mut [SearchResult]) {
    for result in results.iter_mut() {
        if result.highlight.is_some() {
            continue;
        }
        let candidates = result_candidates(result);
        if let Some(built) = build_highlight(query_text, &candidates) {
            result.highlight = Some(built.snippet);
            result.highlight_source = Some(built.source);
        }
    }
}
