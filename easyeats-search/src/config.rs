//! Engine configuration.
//!
//! One immutable configuration object, built once at startup from
//! environment variables and passed into the orchestrator's constructor.
//! There is no global client singleton anywhere in this crate; tests build
//! their own `SearchConfig` (or skip it entirely and inject a backend).

use std::str::FromStr;
use std::time::Duration;

use crate::backend::{IndexConfig, RelationalConfig};

/// Which backend adapter serves searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// Relational ranking function over PostgreSQL.
    #[default]
    Relational,
    /// External managed search index.
    Index,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relational" => Ok(BackendKind::Relational),
            "index" => Ok(BackendKind::Index),
            other => Err(format!(
                "unknown search backend '{}', expected 'relational' or 'index'",
                other
            )),
        }
    }
}

/// Search engine configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Active backend adapter.
    pub backend: BackendKind,
    /// Deadline for every backend call (search, suggest, health).
    pub timeout: Duration,
    /// Backend-derived suggestion cap per request.
    pub suggest_limit: i32,
    /// Debounce delay for keystroke-triggered suggestion fetches.
    pub suggest_debounce: Duration,
    /// Relational adapter settings.
    pub relational: RelationalConfig,
    /// Index adapter settings.
    pub index: IndexConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            timeout: Duration::from_millis(5000),
            suggest_limit: crate::suggest::DEFAULT_SUGGESTION_LIMIT,
            suggest_debounce: Duration::from_millis(200),
            relational: RelationalConfig::default(),
            index: IndexConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Create a search configuration from environment variables.
    ///
    /// Environment variables:
    /// - `EASYEATS_SEARCH_BACKEND`: "relational" or "index" (default: relational)
    /// - `EASYEATS_SEARCH_TIMEOUT_MS`: backend call deadline (default: 5000)
    /// - `EASYEATS_SUGGEST_LIMIT`: backend suggestion cap (default: 8)
    /// - `EASYEATS_SUGGEST_DEBOUNCE_MS`: suggestion debounce (default: 200)
    /// - `EASYEATS_DB_*`: relational adapter settings
    /// - `EASYEATS_INDEX_*`: index adapter settings
    pub fn from_env() -> Self {
        let backend = std::env::var("EASYEATS_SEARCH_BACKEND")
            .ok()
            .and_then(|s| match s.parse() {
                Ok(kind) => Some(kind),
                Err(err) => {
                    tracing::warn!("{}, falling back to relational", err);
                    None
                }
            })
            .unwrap_or_default();

        let timeout = Duration::from_millis(
            std::env::var("EASYEATS_SEARCH_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5000),
        );

        let suggest_limit = std::env::var("EASYEATS_SUGGEST_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(crate::suggest::DEFAULT_SUGGESTION_LIMIT);

        let suggest_debounce = Duration::from_millis(
            std::env::var("EASYEATS_SUGGEST_DEBOUNCE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(200),
        );

        Self {
            backend,
            timeout,
            suggest_limit,
            suggest_debounce,
            relational: RelationalConfig::from_env(),
            index: IndexConfig::from_env(),
        }
    }
}
