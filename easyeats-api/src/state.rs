//! Shared application state for Axum routers.

use std::sync::Arc;

use easyeats_search::backend::SearchBackend;
use easyeats_search::{
    BackendKind, DirectoryStore, IndexBackend, RelationalBackend, SearchConfig,
    SearchOrchestrator, SuggestionEngine,
};

use crate::error::ApiResult;

/// Application-wide state shared across all routes.
///
/// Everything here is constructed once at startup from an explicit
/// `SearchConfig` and immutable afterwards; concurrent requests share it
/// read-only. Tests build their own AppState around an in-memory backend.
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchOrchestrator>,
    pub suggestions: Arc<SuggestionEngine>,
    pub directory: Arc<dyn DirectoryStore>,
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Wire up state around explicit collaborators (dependency injection;
    /// the only constructor tests need).
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        directory: Arc<dyn DirectoryStore>,
        config: &SearchConfig,
    ) -> Self {
        let search = Arc::new(SearchOrchestrator::new(backend.clone(), config.timeout));
        let suggestions = Arc::new(
            SuggestionEngine::new(backend, config.timeout).with_limit(config.suggest_limit),
        );

        Self {
            search,
            suggestions,
            directory,
            start_time: std::time::Instant::now(),
        }
    }

    /// Build state for the configured backend.
    ///
    /// This is the single place that branches on backend identity; from
    /// here on everything speaks to `dyn SearchBackend`. Directory reads
    /// (ratings) always come from the relational store, matching the
    /// production topology where the record store exists regardless of
    /// which index serves search traffic.
    pub fn from_config(config: &SearchConfig) -> ApiResult<Self> {
        let relational = Arc::new(RelationalBackend::from_config(&config.relational)?);

        let backend: Arc<dyn SearchBackend> = match config.backend {
            BackendKind::Relational => relational.clone(),
            BackendKind::Index => Arc::new(IndexBackend::from_config(config.index.clone())?),
        };

        Ok(Self::new(backend, relational, config))
    }
}

// Use macro to reduce boilerplate for FromRef implementations
crate::impl_from_ref!(Arc<SearchOrchestrator>, search);
crate::impl_from_ref!(Arc<SuggestionEngine>, suggestions);
crate::impl_from_ref!(Arc<dyn DirectoryStore>, directory);
crate::impl_from_ref!(std::time::Instant, start_time);
