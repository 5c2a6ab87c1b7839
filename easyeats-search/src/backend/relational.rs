//! Relational ranking adapter.
//!
//! Delegates ranking to the `search_restaurants` SQL function over a
//! deadpool-postgres pool. The function owns the ranking semantics; this
//! adapter only binds parameters, preserves the returned order, and maps
//! rows. Suggestions come from the `search_suggestions` table by
//! normalized-term prefix.

use std::time::Duration;

use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use easyeats_core::{
    HighlightSource, Query, RatingSource, RatingSources, RestaurantRecord, SearchResult,
    Suggestion, SuggestionKind,
};
use tokio_postgres::{NoTls, Row};

use crate::error::{BackendResult, SearchError};
use crate::store::DirectoryStore;

use async_trait::async_trait;

use super::SearchBackend;

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct RelationalConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Connection timeout
    pub timeout: Duration,
}

impl Default for RelationalConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "easyeats".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl RelationalConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("EASYEATS_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("EASYEATS_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("EASYEATS_DB_NAME").unwrap_or_else(|_| "easyeats".to_string()),
            user: std::env::var("EASYEATS_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("EASYEATS_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("EASYEATS_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("EASYEATS_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> BackendResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| SearchError::unavailable(format!("failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// ADAPTER
// ============================================================================

/// Search backend over the relational ranking function.
#[derive(Clone)]
pub struct RelationalBackend {
    pool: Pool,
}

impl RelationalBackend {
    /// Create a new adapter with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new adapter from configuration.
    pub fn from_config(config: &RelationalConfig) -> BackendResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> BackendResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(SearchError::from)
    }
}

#[async_trait]
impl SearchBackend for RelationalBackend {
    async fn search(&self, query: &Query) -> BackendResult<Vec<SearchResult>> {
        let conn = self.get_conn().await?;

        // Empty tag lists are bound as SQL NULL, never as an empty array:
        // the ranking function treats NULL as "unfiltered" while an empty
        // array would match nothing.
        let cuisines: Option<&[String]> =
            (!query.cuisines.is_empty()).then_some(query.cuisines.as_slice());
        let features: Option<&[String]> =
            (!query.features.is_empty()).then_some(query.features.as_slice());
        let city = query.city.as_deref();

        let rows = conn
            .query(
                "SELECT restaurant_id, slug, name, city, description, \
                        cuisines, features, highlight, highlight_source, rank \
                 FROM search_restaurants($1, $2, $3, $4, $5, $6)",
                &[
                    &query.text,
                    &city,
                    &cuisines,
                    &features,
                    &query.limit,
                    &query.offset,
                ],
            )
            .await?;

        // The function's order IS the ranking; map rows without re-sorting.
        Ok(rows.iter().map(row_to_result).collect())
    }

    async fn suggest(&self, prefix: &str, limit: i32) -> BackendResult<Vec<Suggestion>> {
        let conn = self.get_conn().await?;

        let pattern = format!("{}%", escape_like(&prefix.to_lowercase()));

        let rows = conn
            .query(
                "SELECT s.id, s.term, s.kind, s.restaurant_id, r.slug, r.name \
                 FROM search_suggestions s \
                 LEFT JOIN restaurants r ON r.id = s.restaurant_id \
                 WHERE s.normalized_term LIKE $1 \
                 ORDER BY s.popularity_score DESC \
                 LIMIT $2",
                &[&pattern, &(limit as i64)],
            )
            .await?;

        Ok(rows.iter().filter_map(row_to_suggestion).collect())
    }

    async fn health_check(&self) -> BackendResult<bool> {
        let conn = self.get_conn().await?;
        conn.query_one("SELECT 1", &[]).await?;
        Ok(true)
    }
}

#[async_trait]
impl DirectoryStore for RelationalBackend {
    async fn restaurant_by_slug(&self, slug: &str) -> BackendResult<Option<RestaurantRecord>> {
        let conn = self.get_conn().await?;

        let row = conn
            .query_opt(
                "SELECT id, slug, name, city, description, cuisines, features, published, \
                        rating_google, rating_google_count, \
                        rating_tripadvisor, rating_tripadvisor_count, \
                        rating_easyeats, rating_easyeats_count, \
                        updated_at \
                 FROM restaurants WHERE slug = $1 AND published",
                &[&slug],
            )
            .await?;

        Ok(row.map(|row| row_to_record(&row)))
    }
}

// ============================================================================
// ROW MAPPING
// ============================================================================

fn row_to_result(row: &Row) -> SearchResult {
    let highlight_source: Option<String> = row.get("highlight_source");

    SearchResult {
        restaurant_id: row.get("restaurant_id"),
        slug: row.get("slug"),
        name: row.get("name"),
        city: row.get("city"),
        description: row.get("description"),
        rank: row.get("rank"),
        highlight: row.get("highlight"),
        highlight_source: highlight_source.as_deref().and_then(HighlightSource::from_tag),
        cuisines: row
            .get::<_, Option<Vec<String>>>("cuisines")
            .unwrap_or_default(),
        features: row
            .get::<_, Option<Vec<String>>>("features")
            .unwrap_or_default(),
    }
}

fn row_to_suggestion(row: &Row) -> Option<Suggestion> {
    let kind = match row.get::<_, String>("kind").as_str() {
        "restaurant" => SuggestionKind::Restaurant,
        "dish" => SuggestionKind::Dish,
        "area" => SuggestionKind::Area,
        "query" => SuggestionKind::Query,
        other => {
            tracing::warn!(kind = other, "skipping suggestion with unknown kind");
            return None;
        }
    };

    let restaurant = match (
        row.get::<_, Option<uuid::Uuid>>("restaurant_id"),
        row.get::<_, Option<String>>("slug"),
        row.get::<_, Option<String>>("name"),
    ) {
        (Some(restaurant_id), Some(slug), Some(name)) => Some(easyeats_core::RestaurantRef {
            restaurant_id,
            slug,
            name,
        }),
        _ => None,
    };

    Some(Suggestion {
        id: row.get("id"),
        term: row.get("term"),
        kind,
        restaurant,
    })
}

fn row_to_record(row: &Row) -> RestaurantRecord {
    RestaurantRecord {
        restaurant_id: row.get("id"),
        slug: row.get("slug"),
        name: row.get("name"),
        city: row.get("city"),
        description: row.get("description"),
        cuisines: row
            .get::<_, Option<Vec<String>>>("cuisines")
            .unwrap_or_default(),
        features: row
            .get::<_, Option<Vec<String>>>("features")
            .unwrap_or_default(),
        published: row.get("published"),
        ratings: RatingSources {
            google: rating_source(row, "rating_google", "rating_google_count"),
            tripadvisor: rating_source(row, "rating_tripadvisor", "rating_tripadvisor_count"),
            easyeats: rating_source(row, "rating_easyeats", "rating_easyeats_count"),
        },
        updated_at: row.get("updated_at"),
    }
}

fn rating_source(row: &Row, rating_col: &str, count_col: &str) -> RatingSource {
    RatingSource {
        rating: row.get(rating_col),
        count: row.get::<_, Option<i32>>(count_col).map(i64::from),
    }
}

/// Escape LIKE metacharacters in a user-supplied prefix.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use easyeats_core::Query;

    fn query_with_tags(cuisines: &[&str], features: &[&str]) -> Query {
        Query {
            text: "beef".to_string(),
            city: None,
            cuisines: cuisines.iter().map(|s| s.to_string()).collect(),
            features: features.iter().map(|s| s.to_string()).collect(),
            limit: 20,
            offset: 0,
        }
    }

    #[test]
    fn test_empty_tag_lists_bind_as_null() {
        // The "null means unfiltered" contract: an empty Vec must become
        // None before it reaches the wire.
        let query = query_with_tags(&[], &[]);
        let cuisines: Option<&[String]> =
            (!query.cuisines.is_empty()).then_some(query.cuisines.as_slice());
        let features: Option<&[String]> =
            (!query.features.is_empty()).then_some(query.features.as_slice());

        assert!(cuisines.is_none());
        assert!(features.is_none());
    }

    #[test]
    fn test_populated_tag_lists_bind_as_arrays() {
        let query = query_with_tags(&["maltese", "grill"], &["outdoor-seating"]);
        let cuisines: Option<&[String]> =
            (!query.cuisines.is_empty()).then_some(query.cuisines.as_slice());

        assert_eq!(cuisines.map(|c| c.len()), Some(2));
    }

    #[test]
    fn test_escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("pizza"), "pizza");
    }

    #[test]
    fn test_config_defaults() {
        let config = RelationalConfig::default();
        assert_eq!(config.port, 5432);
        assert_eq!(config.dbname, "easyeats");
        assert_eq!(config.max_size, 16);
    }
}
