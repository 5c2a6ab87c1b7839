//! REST API Routes Module
//!
//! This module contains all REST API route handlers:
//! - Search and autocomplete under /api/v1/search
//! - Restaurant ratings under /api/v1/restaurants
//! - Health check endpoints (Kubernetes-compatible)
//! - OpenAPI spec and optional Swagger UI
//! - CORS support for browser-based clients

pub mod health;
pub mod rating;
pub mod search;
pub mod suggestions;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::state::AppState;

// Re-export route creation functions for convenience
pub use health::create_router as health_router;
pub use rating::create_router as rating_router;
pub use search::create_router as search_router;
pub use suggestions::create_router as suggestions_router;

// ============================================================================
// OPENAPI ENDPOINTS
// ============================================================================

/// Handler for /openapi.json endpoint.
#[cfg(feature = "openapi")]
async fn openapi_json() -> impl axum::response::IntoResponse {
    use utoipa::OpenApi;

    axum::Json(crate::openapi::ApiDoc::openapi())
}

/// Handler for /openapi.yaml endpoint.
#[cfg(feature = "openapi")]
async fn openapi_yaml() -> impl axum::response::IntoResponse {
    use axum::http::StatusCode;
    use utoipa::OpenApi;

    match serde_yaml::to_string(&crate::openapi::ApiDoc::openapi()) {
        Ok(yaml) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/yaml")],
            yaml,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            format!("Failed to generate YAML: {}", e),
        ),
    }
}

// ============================================================================
// ROUTER ASSEMBLY
// ============================================================================

/// Create the complete API router.
///
/// Routes:
/// - /api/v1/search and /api/v1/search/suggestions
/// - /api/v1/restaurants/{slug}/rating
/// - /health/* (public probes)
/// - /openapi.json, /openapi.yaml (when the openapi feature is enabled)
/// - /swagger-ui (when the swagger-ui feature is enabled)
pub fn create_api_router(state: AppState, api_config: &ApiConfig) -> Router {
    let api = Router::new()
        .nest(
            "/search",
            search::create_router().merge(suggestions::create_router()),
        )
        .nest("/restaurants", rating::create_router());

    let router = Router::new()
        .nest("/api/v1", api)
        .nest("/health", health::create_router());

    #[cfg(feature = "openapi")]
    let router = router
        .route("/openapi.json", axum::routing::get(openapi_json))
        .route("/openapi.yaml", axum::routing::get(openapi_yaml));

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;
        router.merge(
            SwaggerUi::new("/swagger-ui").url("/openapi.json", crate::openapi::ApiDoc::openapi()),
        )
    };

    let cors = build_cors_layer(api_config);

    router.with_state(state).layer(cors)
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        // Development mode: allow all origins
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any).allow_headers(Any)
    } else {
        // Production mode: only allow configured origins
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        if config.cors_allow_credentials {
            cors.allow_origin(origins).allow_credentials(true)
        } else {
            cors.allow_origin(origins)
        }
    }
}
