//! Error types for search operations.
//!
//! Adapters collapse every transport, timeout, and backend-reported fault
//! into this small taxonomy at their own boundary. Nothing above the
//! orchestrator ever sees a raw driver error, and nothing in this crate
//! retries - retry policy belongs to whoever owns the request.

use std::time::Duration;
use thiserror::Error;

/// Faults a search backend can surface.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Transport failure, backend-reported error, or exhausted pool.
    /// Deliberately generic: callers only learn "search unavailable".
    #[error("search backend unavailable: {reason}")]
    BackendUnavailable { reason: String },

    /// The caller-supplied deadline elapsed. Treated identically to
    /// `BackendUnavailable` by everything user-facing.
    #[error("search backend timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    /// The backend answered with a payload we cannot interpret.
    #[error("malformed backend response: {reason}")]
    InvalidResponse { reason: String },
}

impl SearchError {
    /// Create a BackendUnavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        SearchError::BackendUnavailable {
            reason: reason.into(),
        }
    }

    /// Create an InvalidResponse error.
    pub fn invalid_response(reason: impl Into<String>) -> Self {
        SearchError::InvalidResponse {
            reason: reason.into(),
        }
    }
}

/// Convert from tokio_postgres::Error to SearchError.
impl From<tokio_postgres::Error> for SearchError {
    fn from(err: tokio_postgres::Error) -> Self {
        // Log the full error for debugging
        tracing::error!("Database error: {:?}", err);

        // Return a generic error to avoid leaking internal details
        SearchError::unavailable("database query failed")
    }
}

/// Convert from deadpool_postgres::PoolError to SearchError.
impl From<deadpool_postgres::PoolError> for SearchError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        tracing::error!("Connection pool error: {:?}", err);

        SearchError::unavailable("failed to acquire database connection")
    }
}

/// Convert from reqwest::Error to SearchError.
impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Index transport error: {:?}", err);

        SearchError::unavailable("index request failed")
    }
}

/// Result type alias for backend operations.
pub type BackendResult<T> = Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_is_generic() {
        let err = SearchError::unavailable("database query failed");
        let display = format!("{}", err);

        assert!(display.contains("search backend unavailable"));
        assert!(display.contains("database query failed"));
    }

    #[test]
    fn test_timeout_carries_elapsed() {
        let err = SearchError::Timeout {
            elapsed: Duration::from_millis(5000),
        };
        assert!(format!("{}", err).contains("timed out"));
    }
}
