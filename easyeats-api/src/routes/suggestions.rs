//! Suggestion REST API Routes
//!
//! Prefix autocomplete for the search box. Empty input answers an empty
//! list; backend trouble degrades to the synthetic query suggestion alone.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use easyeats_search::SuggestionEngine;

use crate::{extractors::QueryPairs, types::SuggestionsResponse};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/search/suggestions - Query-prefix autocomplete
#[utoipa::path(
    get,
    path = "/api/v1/search/suggestions",
    tag = "Search",
    params(
        ("q" = Option<String>, Query, description = "Prefix typed so far"),
    ),
    responses(
        (status = 200, description = "Autocomplete suggestions", body = SuggestionsResponse),
    )
)]
pub async fn suggestions(
    State(engine): State<Arc<SuggestionEngine>>,
    pairs: QueryPairs,
) -> impl IntoResponse {
    let suggestions = engine.suggest(pairs.first("q").unwrap_or("")).await;

    Json(SuggestionsResponse { suggestions })
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the suggestions routes router.
pub fn create_router() -> axum::Router<crate::state::AppState> {
    axum::Router::new().route("/suggestions", axum::routing::get(suggestions))
}
