//! Search backend adapters.
//!
//! One contract, several index technologies. The trait is the whole
//! caller-visible surface: pick an adapter at startup from configuration,
//! hand it to the orchestrator as `Arc<dyn SearchBackend>`, and nothing
//! downstream ever branches on which one it got.

pub mod index;
pub mod memory;
pub mod relational;

pub use index::{IndexBackend, IndexConfig};
pub use memory::{MemoryBackend, SuggestionSeed};
pub use relational::{RelationalBackend, RelationalConfig};

use async_trait::async_trait;
use easyeats_core::{Query, SearchResult, Suggestion};

use crate::error::BackendResult;

/// Contract every search backend conforms to.
///
/// Failure semantics: implementations never retry. Any transport, timeout,
/// or backend-reported error surfaces as a generic `SearchError`; the
/// orchestrator decides what the caller sees.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Execute a normalized query and return ranked hits.
    ///
    /// Ordering is the backend's ranking contract (descending by `rank`);
    /// implementations MUST preserve the backend's order into the returned
    /// vec and MUST NOT re-sort.
    async fn search(&self, query: &Query) -> BackendResult<Vec<SearchResult>>;

    /// Up to `limit` autocomplete suggestions for a term prefix, most
    /// popular first. The synthetic query suggestion is the engine's
    /// concern, not the adapter's.
    async fn suggest(&self, prefix: &str, limit: i32) -> BackendResult<Vec<Suggestion>>;

    /// Cheap connectivity probe for readiness checks.
    async fn health_check(&self) -> BackendResult<bool>;
}
