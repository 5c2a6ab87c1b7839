//! External index adapter.
//!
//! Delegates full-text matching to a managed search index (Typesense-style
//! HTTP API). Queries run over the `name` and `content` fields, grouped by
//! restaurant so at most one hit per restaurant survives, filtered to
//! published documents, with native highlighting enabled. Filter predicates
//! are ANDed; a predicate whose filter list is empty is omitted entirely
//! rather than sent as an always-true clause.

use std::time::Duration;

use easyeats_core::{HighlightSource, Query, RestaurantRef, SearchResult, Suggestion, SuggestionKind};
use serde::Deserialize;

use crate::error::{BackendResult, SearchError};

use async_trait::async_trait;

use super::SearchBackend;

const API_KEY_HEADER: &str = "X-TYPESENSE-API-KEY";

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Managed index connection configuration.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Base URL of the index service, scheme included.
    pub url: String,
    /// Search-scoped API key.
    pub api_key: String,
    /// Collection holding restaurant documents.
    pub restaurants_collection: String,
    /// Collection holding suggestion documents.
    pub suggestions_collection: String,
    /// Connection timeout for the HTTP client.
    pub connect_timeout: Duration,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8108".to_string(),
            api_key: "".to_string(),
            restaurants_collection: "restaurants".to_string(),
            suggestions_collection: "search_suggestions".to_string(),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl IndexConfig {
    /// Create an index configuration from environment variables.
    ///
    /// `EASYEATS_INDEX_URL` accepts both a bare host ("search.internal:8108")
    /// and a full URL; a missing scheme defaults to http.
    pub fn from_env() -> Self {
        let raw_url =
            std::env::var("EASYEATS_INDEX_URL").unwrap_or_else(|_| "localhost:8108".to_string());
        let url = if raw_url.starts_with("http://") || raw_url.starts_with("https://") {
            raw_url
        } else {
            format!("http://{}", raw_url)
        };

        Self {
            url: url.trim_end_matches('/').to_string(),
            api_key: std::env::var("EASYEATS_INDEX_API_KEY").unwrap_or_default(),
            restaurants_collection: std::env::var("EASYEATS_INDEX_RESTAURANTS_COLLECTION")
                .unwrap_or_else(|_| "restaurants".to_string()),
            suggestions_collection: std::env::var("EASYEATS_INDEX_SUGGESTIONS_COLLECTION")
                .unwrap_or_else(|_| "search_suggestions".to_string()),
            connect_timeout: Duration::from_millis(
                std::env::var("EASYEATS_INDEX_CONNECT_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5000),
            ),
        }
    }
}

// ============================================================================
// ADAPTER
// ============================================================================

/// Search backend over the managed index.
#[derive(Debug, Clone)]
pub struct IndexBackend {
    http: reqwest::Client,
    config: IndexConfig,
}

impl IndexBackend {
    /// Create a new adapter from configuration.
    ///
    /// Fails fast when the API key is missing rather than letting every
    /// request 401.
    pub fn from_config(config: IndexConfig) -> BackendResult<Self> {
        if config.api_key.is_empty() {
            return Err(SearchError::unavailable(
                "EASYEATS_INDEX_API_KEY is not set",
            ));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| SearchError::unavailable(format!("failed to build http client: {}", e)))?;

        Ok(Self { http, config })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/collections/{}/documents/search", self.config.url, collection)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> BackendResult<T> {
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(%status, "index search returned an error status");
            return Err(SearchError::unavailable(format!(
                "index returned status {}",
                status
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SearchError::invalid_response(format!("index response: {}", e)))
    }
}

#[async_trait]
impl SearchBackend for IndexBackend {
    async fn search(&self, query: &Query) -> BackendResult<Vec<SearchResult>> {
        let q = if query.text.is_empty() { "*" } else { &query.text };

        let params = vec![
            ("q", q.to_string()),
            ("query_by", "name,content".to_string()),
            ("group_by", "restaurant_id".to_string()),
            ("group_limit", "1".to_string()),
            ("highlight_full_fields", "name,content".to_string()),
            ("filter_by", build_filter(query)),
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
        ];

        let body: IndexSearchResponse = self
            .get_json(&self.collection_url(&self.config.restaurants_collection), &params)
            .await?;

        // One result per group: the group's best hit, in index order.
        Ok(body
            .grouped_hits
            .into_iter()
            .filter_map(|group| group.hits.into_iter().next())
            .map(hit_to_result)
            .collect())
    }

    async fn suggest(&self, prefix: &str, limit: i32) -> BackendResult<Vec<Suggestion>> {
        let params = vec![
            ("q", prefix.to_string()),
            ("query_by", "term".to_string()),
            ("filter_by", "kind:[restaurant,dish]".to_string()),
            ("sort_by", "popularity_score:desc".to_string()),
            ("per_page", limit.to_string()),
        ];

        let body: SuggestSearchResponse = self
            .get_json(&self.collection_url(&self.config.suggestions_collection), &params)
            .await?;

        Ok(body
            .hits
            .into_iter()
            .filter_map(|hit| hit.document.into_suggestion())
            .collect())
    }

    async fn health_check(&self) -> BackendResult<bool> {
        let response = self
            .http
            .get(format!("{}/health", self.config.url))
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}

/// Compose the `filter_by` expression for a query.
///
/// Published-only is always enforced; city/cuisine/feature predicates are
/// appended only when their filter is present.
fn build_filter(query: &Query) -> String {
    let mut predicates = vec!["status:=published".to_string()];

    if let Some(city) = &query.city {
        predicates.push(format!("city:=`{}`", city));
    }
    if !query.cuisines.is_empty() {
        predicates.push(format!("cuisines:=[{}]", query.cuisines.join(",")));
    }
    if !query.features.is_empty() {
        predicates.push(format!("features:=[{}]", query.features.join(",")));
    }

    predicates.join(" && ")
}

// ============================================================================
// WIRE MODEL
// ============================================================================

#[derive(Debug, Deserialize)]
struct IndexSearchResponse {
    #[serde(default)]
    grouped_hits: Vec<GroupedHits>,
}

#[derive(Debug, Deserialize)]
struct GroupedHits {
    #[serde(default)]
    hits: Vec<IndexHit>,
}

#[derive(Debug, Deserialize)]
struct IndexHit {
    document: IndexDocument,
    #[serde(default)]
    highlights: Vec<IndexHighlight>,
    #[serde(default)]
    text_match: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct IndexDocument {
    restaurant_id: uuid::Uuid,
    slug: String,
    name: String,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    cuisines: Vec<String>,
    #[serde(default)]
    features: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct IndexHighlight {
    field: String,
    #[serde(default)]
    snippet: Option<String>,
}

fn hit_to_result(hit: IndexHit) -> SearchResult {
    // First highlighted field wins. The index's `content` field aggregates
    // description and menu text; its snippets read as description context.
    let highlight = hit
        .highlights
        .iter()
        .find_map(|h| h.snippet.as_ref().map(|snippet| (snippet.clone(), &h.field)));

    let (highlight, highlight_source) = match highlight {
        Some((snippet, field)) => {
            let source = if field == "name" {
                HighlightSource::Name
            } else {
                HighlightSource::Description
            };
            (Some(snippet), Some(source))
        }
        None => (None, None),
    };

    SearchResult {
        restaurant_id: hit.document.restaurant_id,
        slug: hit.document.slug,
        name: hit.document.name,
        city: hit.document.city,
        description: hit.document.description,
        rank: hit.text_match.unwrap_or(0) as f32,
        highlight,
        highlight_source,
        cuisines: hit.document.cuisines,
        features: hit.document.features,
    }
}

#[derive(Debug, Deserialize)]
struct SuggestSearchResponse {
    #[serde(default)]
    hits: Vec<SuggestHit>,
}

#[derive(Debug, Deserialize)]
struct SuggestHit {
    document: SuggestionDocument,
}

#[derive(Debug, Deserialize)]
struct SuggestionDocument {
    id: i64,
    term: String,
    kind: String,
    #[serde(default)]
    restaurant_id: Option<uuid::Uuid>,
    #[serde(default)]
    restaurant_slug: Option<String>,
    #[serde(default)]
    restaurant_name: Option<String>,
}

impl SuggestionDocument {
    fn into_suggestion(self) -> Option<Suggestion> {
        let kind = match self.kind.as_str() {
            "restaurant" => SuggestionKind::Restaurant,
            "dish" => SuggestionKind::Dish,
            "area" => SuggestionKind::Area,
            "query" => SuggestionKind::Query,
            other => {
                tracing::warn!(kind = other, "skipping suggestion with unknown kind");
                return None;
            }
        };

        let restaurant = match (self.restaurant_id, self.restaurant_slug, self.restaurant_name) {
            (Some(restaurant_id), Some(slug), Some(name)) => Some(RestaurantRef {
                restaurant_id,
                slug,
                name,
            }),
            _ => None,
        };

        Some(Suggestion {
            id: self.id,
            term: self.term,
            kind,
            restaurant,
        })
    }
}
