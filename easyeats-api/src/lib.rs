//! EasyEats API - REST API Layer
//!
//! This crate exposes the search & discovery subsystem over HTTP: full-text
//! search, query-prefix autocomplete, combined restaurant ratings, and
//! health probes. The directory application's CRUD surfaces live elsewhere;
//! this service is read-only.

pub mod config;
pub mod error;
pub mod extractors;
pub mod macros;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod state;
pub mod types;

// Re-export commonly used types
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use extractors::QueryPairs;
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::AppState;
pub use types::{RatingResponse, SearchResponse, SuggestionsResponse};
