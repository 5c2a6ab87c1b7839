//! Search REST API Routes
//!
//! This module implements the Axum route handler for full-text restaurant
//! search: free text plus structured filters in, ranked highlighted hits
//! out. Backend faults degrade to an empty result set with an error flag;
//! this route never answers 5xx for a backend outage.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use easyeats_search::{RawSearchParams, SearchOrchestrator};

use crate::{
    extractors::QueryPairs,
    types::{SearchResponse, SEARCH_UNAVAILABLE},
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/search - Full-text restaurant search
#[utoipa::path(
    get,
    path = "/api/v1/search",
    tag = "Search",
    params(
        ("q" = Option<String>, Query, description = "Free-text query; empty matches all"),
        ("city" = Option<String>, Query, description = "City filter"),
        ("cuisines" = Option<Vec<String>>, Query, description = "Cuisine slugs (repeatable)"),
        ("features" = Option<Vec<String>>, Query, description = "Feature slugs (repeatable)"),
        ("limit" = Option<String>, Query, description = "Page size; malformed values default to 20"),
        ("offset" = Option<String>, Query, description = "Pagination offset; malformed values default to 0"),
    ),
    responses(
        (status = 200, description = "Search results, possibly degraded", body = SearchResponse),
    )
)]
pub async fn search(
    State(orchestrator): State<Arc<SearchOrchestrator>>,
    pairs: QueryPairs,
) -> impl IntoResponse {
    let params = RawSearchParams {
        q: pairs.first("q").map(str::to_string),
        city: pairs.first("city").map(str::to_string),
        cuisines: pairs.all("cuisines"),
        features: pairs.all("features"),
        limit: pairs.first("limit").map(str::to_string),
        offset: pairs.first("offset").map(str::to_string),
    };

    let outcome = orchestrator.search(params).await;

    Json(SearchResponse {
        results: outcome.results,
        error: outcome.error.map(|_| SEARCH_UNAVAILABLE.to_string()),
    })
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the search routes router.
pub fn create_router() -> axum::Router<crate::state::AppState> {
    axum::Router::new().route("/", axum::routing::get(search))
}
