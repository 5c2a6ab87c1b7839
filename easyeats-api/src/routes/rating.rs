//! Restaurant Rating REST API Routes
//!
//! Serves the combined rating shown on a restaurant's detail view: a
//! count-weighted mean across the Google, Tripadvisor, and EasyEats review
//! sources, computed on demand from the directory record store.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use easyeats_core::combine_ratings;
use easyeats_search::DirectoryStore;

use crate::{
    error::{ApiError, ApiResult},
    types::RatingResponse,
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/restaurants/{slug}/rating - Combined rating for one restaurant
#[utoipa::path(
    get,
    path = "/api/v1/restaurants/{slug}/rating",
    tag = "Restaurants",
    params(
        ("slug" = String, Path, description = "Restaurant slug"),
    ),
    responses(
        (status = 200, description = "Combined rating; null rating means no ratings yet", body = RatingResponse),
        (status = 404, description = "Unknown or unpublished restaurant", body = ApiError),
        (status = 503, description = "Record store unavailable", body = ApiError),
    )
)]
pub async fn rating(
    State(directory): State<Arc<dyn DirectoryStore>>,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let record = directory
        .restaurant_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::restaurant_not_found(&slug))?;

    let combined = combine_ratings(&record.ratings);

    Ok(Json(RatingResponse {
        restaurant_id: record.restaurant_id,
        slug: record.slug,
        rating: combined.rating,
        total_count: combined.total_count,
        source_counts: combined.source_counts,
    }))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the restaurant routes router.
pub fn create_router() -> axum::Router<crate::state::AppState> {
    axum::Router::new().route("/:slug/rating", axum::routing::get(rating))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::AppState;
    use easyeats_core::{new_restaurant_id, RatingSource, RatingSources, RestaurantRecord};
    use easyeats_search::backend::MemoryBackend;
    use easyeats_search::SearchConfig;

    fn state_with_ratings(ratings: RatingSources) -> AppState {
        let backend = Arc::new(MemoryBackend::new());
        backend.insert_restaurant(RestaurantRecord {
            restaurant_id: new_restaurant_id(),
            slug: "tas-sirena".to_string(),
            name: "Ta' Sirena".to_string(),
            city: Some("Marsaxlokk".to_string()),
            description: None,
            cuisines: Vec::new(),
            features: Vec::new(),
            published: true,
            ratings,
            updated_at: chrono::Utc::now(),
        });
        AppState::new(backend.clone(), backend, &SearchConfig::default())
    }

    #[tokio::test]
    async fn test_combined_rating_is_count_weighted() {
        let state = state_with_ratings(RatingSources {
            google: RatingSource {
                rating: Some(4.0),
                count: Some(10),
            },
            tripadvisor: RatingSource {
                rating: None,
                count: Some(5),
            },
            easyeats: RatingSource {
                rating: Some(5.0),
                count: Some(0),
            },
        });

        let response = rating(
            State(state.directory.clone()),
            Path("tas-sirena".to_string()),
        )
        .await
        .unwrap();
        let bytes = axum::body::to_bytes(response.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: RatingResponse = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(parsed.rating, Some(4.0));
        assert_eq!(parsed.total_count, 10);
    }

    #[tokio::test]
    async fn test_no_ratings_yet_serializes_null_not_zero() {
        let state = state_with_ratings(RatingSources::default());

        let response = rating(
            State(state.directory.clone()),
            Path("tas-sirena".to_string()),
        )
        .await
        .unwrap();
        let bytes = axum::body::to_bytes(response.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert!(parsed["rating"].is_null());
        assert_eq!(parsed["total_count"], 0);
    }

    #[tokio::test]
    async fn test_unknown_slug_is_404() {
        let state = state_with_ratings(RatingSources::default());

        let err = match rating(State(state.directory.clone()), Path("nowhere".to_string())).await {
            Ok(_) => panic!("expected a not-found error"),
            Err(err) => err,
        };

        assert_eq!(err.code, ErrorCode::RestaurantNotFound);
    }
}
