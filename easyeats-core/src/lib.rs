//! EasyEats Core - Search Domain Types
//!
//! Pure data structures with no behavior. All other crates depend on this.
//! This crate contains ONLY data types and small pure helpers - no I/O,
//! no backend knowledge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod rating;

pub use rating::{
    combine_ratings, CombinedRating, RatingSource, RatingSources, SourceCounts,
};

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Restaurant identifier using UUIDv7 for timestamp-sortable IDs.
/// UUIDv7 embeds a Unix timestamp, making IDs naturally sortable by creation time.
pub type RestaurantId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a new UUIDv7 RestaurantId (timestamp-sortable).
pub fn new_restaurant_id() -> RestaurantId {
    Uuid::now_v7()
}

// ============================================================================
// QUERY
// ============================================================================

/// A canonical search query as produced by the normalizer.
///
/// Invariants (upheld by `easyeats_search::normalize`):
/// - `limit > 0`, `offset >= 0`
/// - `text` is trimmed (empty means "match all", bounded by filters)
/// - `city` is trimmed and never the empty string
/// - tag lists are deduplicated preserving first-seen order, so the same
///   logical filter always reaches a backend as the same ordered list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Query {
    /// Free-text query. Empty string matches everything.
    pub text: String,
    /// City filter, if any.
    pub city: Option<String>,
    /// Cuisine tag slugs, deduplicated, first-seen order.
    pub cuisines: Vec<String>,
    /// Feature tag slugs, deduplicated, first-seen order.
    pub features: Vec<String>,
    /// Maximum number of results. Always positive.
    pub limit: i32,
    /// Pagination offset. Never negative.
    pub offset: i32,
}

// ============================================================================
// SEARCH RESULTS
// ============================================================================

/// Which denormalized field a highlight snippet was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum HighlightSource {
    Name,
    Description,
    Cuisines,
    Features,
    MenuItem,
}

impl HighlightSource {
    /// Wire tag as stored by the relational ranking function.
    pub fn tag(&self) -> &'static str {
        match self {
            HighlightSource::Name => "name",
            HighlightSource::Description => "description",
            HighlightSource::Cuisines => "cuisines",
            HighlightSource::Features => "features",
            HighlightSource::MenuItem => "menu_item",
        }
    }

    /// Parse a wire tag. Unknown tags yield None rather than an error;
    /// a missing source is display metadata, not a fault.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "name" => Some(HighlightSource::Name),
            "description" => Some(HighlightSource::Description),
            "cuisines" => Some(HighlightSource::Cuisines),
            "features" => Some(HighlightSource::Features),
            "menu_item" => Some(HighlightSource::MenuItem),
            _ => None,
        }
    }
}

/// One ranked search hit.
///
/// Security invariant: when `highlight` is Some, it contains no HTML tags
/// other than `<mark>...</mark>` and no unescaped `&`, `<`, `>`, `"` or `'`
/// outside that tag. Both adapters and the highlight builder uphold this;
/// the API serves the snippet verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SearchResult {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub restaurant_id: RestaurantId,
    pub slug: String,
    pub name: String,
    pub city: Option<String>,
    pub description: Option<String>,
    /// Relevance rank as reported by the backend. Descending order is the
    /// backend's contract; nothing downstream re-sorts.
    pub rank: f32,
    /// HTML-safe snippet with the matching span wrapped in `<mark>`.
    pub highlight: Option<String>,
    pub highlight_source: Option<HighlightSource>,
    pub cuisines: Vec<String>,
    pub features: Vec<String>,
}

// ============================================================================
// SUGGESTIONS
// ============================================================================

/// Kind of autocomplete suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Restaurant,
    Dish,
    Area,
    Query,
}

/// Reference to the restaurant a suggestion points at, when it has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RestaurantRef {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub restaurant_id: RestaurantId,
    pub slug: String,
    pub name: String,
}

/// An autocomplete candidate shown while the user types.
///
/// Invariant (upheld by the suggestion engine): exactly one suggestion per
/// response has `kind == Query`; it equals the trimmed input verbatim and is
/// always first. The synthetic suggestion carries `id == -1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Suggestion {
    pub id: i64,
    pub term: String,
    pub kind: SuggestionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<RestaurantRef>,
}

impl Suggestion {
    /// The synthetic "run the full query" suggestion for a trimmed input.
    pub fn query(term: impl Into<String>) -> Self {
        Self {
            id: -1,
            term: term.into(),
            kind: SuggestionKind::Query,
            restaurant: None,
        }
    }
}

// ============================================================================
// DIRECTORY RECORDS
// ============================================================================

/// Denormalized restaurant row as exposed by the collaborator record store.
///
/// The record store is an external system; this is the narrow read-only shape
/// the search subsystem consumes (detail-view ratings, in-memory adapter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RestaurantRecord {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub restaurant_id: RestaurantId,
    pub slug: String,
    pub name: String,
    pub city: Option<String>,
    pub description: Option<String>,
    pub cuisines: Vec<String>,
    pub features: Vec<String>,
    /// Only published restaurants are searchable.
    pub published: bool,
    pub ratings: RatingSources,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
}
