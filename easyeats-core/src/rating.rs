//! Combined rating math.
//!
//! Restaurants carry up to three independent review sources (Google,
//! Tripadvisor, EasyEats). The detail view shows a single count-weighted
//! mean across whichever sources actually have data:
//!
//! ```text
//! R_combined = Σ(rating_i × count_i) / Σ(count_i)
//! ```
//!
//! A source contributes only when its rating is known AND its review count
//! is a positive integer. With no contributing sources the combined rating
//! is None, rendered as "no ratings yet" - never zero.

use serde::{Deserialize, Serialize};

/// Rating signal from a single review provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RatingSource {
    /// Average rating in 0..=5, or None if the provider has no data.
    pub rating: Option<f64>,
    /// Number of reviews behind the rating, or None if unknown.
    pub count: Option<i64>,
}

impl RatingSource {
    /// Weight this source contributes to the combined mean.
    fn weight(&self) -> i64 {
        match (self.rating, self.count) {
            (Some(_), Some(count)) if count > 0 => count,
            _ => 0,
        }
    }
}

/// Per-provider rating signals for one restaurant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RatingSources {
    pub google: RatingSource,
    pub tripadvisor: RatingSource,
    pub easyeats: RatingSource,
}

/// Review counts that actually contributed to a combined rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SourceCounts {
    pub google: i64,
    pub tripadvisor: i64,
    pub easyeats: i64,
}

/// Count-weighted mean rating across providers.
///
/// Computed on demand per page render, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CombinedRating {
    /// None means "no ratings yet".
    pub rating: Option<f64>,
    pub total_count: i64,
    pub source_counts: SourceCounts,
}

/// Combine up to three rating sources via count-weighted mean.
pub fn combine_ratings(sources: &RatingSources) -> CombinedRating {
    let n_google = sources.google.weight();
    let n_tripadvisor = sources.tripadvisor.weight();
    let n_easyeats = sources.easyeats.weight();

    let total = n_google + n_tripadvisor + n_easyeats;

    if total == 0 {
        return CombinedRating::default();
    }

    let sum = sources.google.rating.unwrap_or(0.0) * n_google as f64
        + sources.tripadvisor.rating.unwrap_or(0.0) * n_tripadvisor as f64
        + sources.easyeats.rating.unwrap_or(0.0) * n_easyeats as f64;

    CombinedRating {
        rating: Some(sum / total as f64),
        total_count: total,
        source_counts: SourceCounts {
            google: n_google,
            tripadvisor: n_tripadvisor,
            easyeats: n_easyeats,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn source(rating: Option<f64>, count: Option<i64>) -> RatingSource {
        RatingSource { rating, count }
    }

    #[test]
    fn test_null_rating_and_zero_count_contribute_nothing() {
        // {4.0, 10}, {null, 5}, {5.0, 0} combine to exactly 4.0: the second
        // source has no rating and the third has zero weight.
        let combined = combine_ratings(&RatingSources {
            google: source(Some(4.0), Some(10)),
            tripadvisor: source(None, Some(5)),
            easyeats: source(Some(5.0), Some(0)),
        });

        assert_eq!(combined.rating, Some(4.0));
        assert_eq!(combined.total_count, 10);
        assert_eq!(
            combined.source_counts,
            SourceCounts {
                google: 10,
                tripadvisor: 0,
                easyeats: 0
            }
        );
    }

    #[test]
    fn test_no_contributing_sources_yields_none() {
        let combined = combine_ratings(&RatingSources {
            google: source(None, None),
            tripadvisor: source(Some(4.5), None),
            easyeats: source(None, Some(12)),
        });

        assert_eq!(combined.rating, None);
        assert_eq!(combined.total_count, 0);
    }

    #[test]
    fn test_weighted_mean_across_sources() {
        let combined = combine_ratings(&RatingSources {
            google: source(Some(4.0), Some(10)),
            tripadvisor: source(Some(2.0), Some(10)),
            easyeats: source(Some(3.0), Some(20)),
        });

        // (4*10 + 2*10 + 3*20) / 40 = 120 / 40
        assert_eq!(combined.rating, Some(3.0));
        assert_eq!(combined.total_count, 40);
    }

    #[test]
    fn test_negative_count_is_ignored() {
        let combined = combine_ratings(&RatingSources {
            google: source(Some(4.0), Some(-3)),
            tripadvisor: source(Some(2.0), Some(1)),
            easyeats: RatingSource::default(),
        });

        assert_eq!(combined.rating, Some(2.0));
        assert_eq!(combined.total_count, 1);
    }

    proptest! {
        /// The combined rating always stays within the hull of contributing
        /// source ratings, and the totals add up.
        #[test]
        fn prop_combined_rating_within_source_bounds(
            ratings in proptest::collection::vec(0.0f64..=5.0, 3),
            counts in proptest::collection::vec(0i64..1000, 3),
        ) {
            let sources = RatingSources {
                google: source(Some(ratings[0]), Some(counts[0])),
                tripadvisor: source(Some(ratings[1]), Some(counts[1])),
                easyeats: source(Some(ratings[2]), Some(counts[2])),
            };

            let combined = combine_ratings(&sources);
            let total: i64 = counts.iter().filter(|c| **c > 0).sum();
            prop_assert_eq!(combined.total_count, total);

            match combined.rating {
                None => prop_assert_eq!(total, 0),
                Some(r) => {
                    let contributing: Vec<f64> = ratings
                        .iter()
                        .zip(&counts)
                        .filter(|(_, c)| **c > 0)
                        .map(|(r, _)| *r)
                        .collect();
                    let lo = contributing.iter().cloned().fold(f64::INFINITY, f64::min);
                    let hi = contributing.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                    prop_assert!(r >= lo - 1e-9 && r <= hi + 1e-9);
                }
            }
        }
    }
}
