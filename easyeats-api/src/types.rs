//! API Request and Response Types
//!
//! Response envelopes for the search, suggestion, and rating endpoints.
//! Domain types themselves live in easyeats-core and serialize directly.

use easyeats_core::{RestaurantId, SearchResult, SourceCounts, Suggestion};
use serde::{Deserialize, Serialize};

/// Wire value of the degraded-search flag.
pub const SEARCH_UNAVAILABLE: &str = "search_unavailable";

/// Response for GET /api/v1/search.
///
/// `error` distinguishes "no results" (empty `results`, no `error`) from
/// "search temporarily unavailable" (empty `results`, `error` set). The
/// status code stays 200 either way; degraded search is not a caller fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SearchResponse {
    /// Ranked hits in backend order.
    pub results: Vec<SearchResult>,
    /// Set to "search_unavailable" when the backend failed or timed out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response for GET /api/v1/search/suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SuggestionsResponse {
    /// Synthetic query suggestion first, then backend suggestions.
    pub suggestions: Vec<Suggestion>,
}

/// Response for GET /api/v1/restaurants/{slug}/rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RatingResponse {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub restaurant_id: RestaurantId,
    pub slug: String,
    /// Count-weighted mean across contributing sources; None renders as
    /// "no ratings yet", never as zero.
    pub rating: Option<f64>,
    pub total_count: i64,
    pub source_counts: SourceCounts,
}
