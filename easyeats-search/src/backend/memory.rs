//! In-memory adapter.
//!
//! Implements the full backend contract over plain vectors: substring
//! matching with a naive deterministic rank, no native highlighting (the
//! orchestrator's highlight builder does the work), prefix suggestions by
//! popularity. Backs the adapter conformance suite and local development
//! without a database or index service.

use std::sync::{Arc, RwLock};

use easyeats_core::{Query, RestaurantRecord, RestaurantRef, SearchResult, Suggestion, SuggestionKind};

use crate::error::BackendResult;
use crate::highlight::find_case_insensitive;
use crate::store::DirectoryStore;

use async_trait::async_trait;

use super::SearchBackend;

/// Seed row for the suggestion side of the in-memory adapter.
#[derive(Debug, Clone)]
pub struct SuggestionSeed {
    pub id: i64,
    pub term: String,
    pub kind: SuggestionKind,
    pub popularity: i64,
    pub restaurant: Option<RestaurantRef>,
}

/// In-memory search backend and directory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    records: Arc<RwLock<Vec<RestaurantRecord>>>,
    suggestions: Arc<RwLock<Vec<SuggestionSeed>>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a restaurant record.
    pub fn insert_restaurant(&self, record: RestaurantRecord) {
        self.records.write().unwrap().push(record);
    }

    /// Seed a suggestion row.
    pub fn insert_suggestion(&self, seed: SuggestionSeed) {
        self.suggestions.write().unwrap().push(seed);
    }

    /// Number of seeded restaurants.
    pub fn record_count(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Rank a record against free text: name matches outrank description
    /// matches, tag matches trail both. Zero means "no text match".
    fn rank(record: &RestaurantRecord, text: &str) -> f32 {
        let mut rank = 0.0;
        if find_case_insensitive(&record.name, text).is_some() {
            rank += 2.0;
        }
        if let Some(description) = &record.description {
            if find_case_insensitive(description, text).is_some() {
                rank += 1.0;
            }
        }
        if find_case_insensitive(&record.cuisines.join(", "), text).is_some()
            || find_case_insensitive(&record.features.join(", "), text).is_some()
        {
            rank += 0.5;
        }
        rank
    }

    fn matches_filters(record: &RestaurantRecord, query: &Query) -> bool {
        if let Some(city) = &query.city {
            match &record.city {
                Some(record_city) if record_city.eq_ignore_ascii_case(city) => {}
                _ => return false,
            }
        }

        query.cuisines.iter().all(|tag| record.cuisines.contains(tag))
            && query.features.iter().all(|tag| record.features.contains(tag))
    }
}

#[async_trait]
impl SearchBackend for MemoryBackend {
    async fn search(&self, query: &Query) -> BackendResult<Vec<SearchResult>> {
        let records = self.records.read().unwrap();

        let mut hits: Vec<(f32, &RestaurantRecord)> = records
            .iter()
            .filter(|record| record.published)
            .filter(|record| Self::matches_filters(record, query))
            .filter_map(|record| {
                if query.text.is_empty() {
                    // Match-all: filters bound the result set, rank is flat.
                    return Some((0.0, record));
                }
                let rank = Self::rank(record, &query.text);
                (rank > 0.0).then_some((rank, record))
            })
            .collect();

        // Deterministic order: rank descending, then name, then slug.
        hits.sort_by(|(rank_a, a), (rank_b, b)| {
            rank_b
                .total_cmp(rank_a)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.slug.cmp(&b.slug))
        });

        Ok(hits
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .map(|(rank, record)| SearchResult {
                restaurant_id: record.restaurant_id,
                slug: record.slug.clone(),
                name: record.name.clone(),
                city: record.city.clone(),
                description: record.description.clone(),
                rank,
                highlight: None,
                highlight_source: None,
                cuisines: record.cuisines.clone(),
                features: record.features.clone(),
            })
            .collect())
    }

    async fn suggest(&self, prefix: &str, limit: i32) -> BackendResult<Vec<Suggestion>> {
        let prefix = prefix.to_lowercase();
        let suggestions = self.suggestions.read().unwrap();

        let mut matches: Vec<&SuggestionSeed> = suggestions
            .iter()
            .filter(|seed| seed.term.to_lowercase().starts_with(&prefix))
            .collect();

        matches.sort_by(|a, b| b.popularity.cmp(&a.popularity).then_with(|| a.id.cmp(&b.id)));

        Ok(matches
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|seed| Suggestion {
                id: seed.id,
                term: seed.term.clone(),
                kind: seed.kind,
                restaurant: seed.restaurant.clone(),
            })
            .collect())
    }

    async fn health_check(&self) -> BackendResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl DirectoryStore for MemoryBackend {
    async fn restaurant_by_slug(&self, slug: &str) -> BackendResult<Option<RestaurantRecord>> {
        let records = self.records.read().unwrap();
        Ok(records
            .iter()
            .find(|record| record.published && record.slug == slug)
            .cloned())
    }
}
