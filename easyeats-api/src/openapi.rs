//! OpenAPI Specification for the EasyEats API
//!
//! This module defines the OpenAPI document for the search & discovery
//! REST API. It uses utoipa to generate the specification from Rust types
//! and route annotations.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::{health, rating, search, suggestions};
use crate::types::{RatingResponse, SearchResponse, SuggestionsResponse};

// Import domain types from easyeats-core
use easyeats_core::{
    HighlightSource, RatingSource, RatingSources, RestaurantRef, SearchResult, SourceCounts,
    Suggestion, SuggestionKind,
};

/// OpenAPI document for the EasyEats search API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "EasyEats Search API",
        version = "0.3.0",
        description = "Search & discovery API for the EasyEats restaurant directory: full-text search, query-prefix autocomplete, and combined ratings",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "EasyEats", url = "https://easyeats.app")
    ),
    servers(
        (url = "https://api.easyeats.app", description = "Production"),
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Search", description = "Full-text restaurant search and autocomplete"),
        (name = "Restaurants", description = "Restaurant detail data"),
        (name = "Health", description = "Liveness and readiness probes"),
    ),
    paths(
        search::search,
        suggestions::suggestions,
        rating::rating,
        health::ping,
        health::live,
        health::ready,
    ),
    components(schemas(
        SearchResponse,
        SuggestionsResponse,
        RatingResponse,
        SearchResult,
        Suggestion,
        SuggestionKind,
        HighlightSource,
        RestaurantRef,
        RatingSource,
        RatingSources,
        SourceCounts,
        ApiError,
        ErrorCode,
        health::HealthResponse,
        health::HealthStatus,
        health::HealthDetails,
        health::ComponentHealth,
    ))
)]
pub struct ApiDoc;
