//! EasyEats Search - Backend-Agnostic Search & Discovery Engine
//!
//! This crate implements the search subsystem behind the restaurant
//! directory: query normalization, a pluggable full-text backend contract
//! with conforming adapters (relational ranking function, external managed
//! index, in-memory), deterministic highlight snippets, prefix autocomplete,
//! and the orchestrator that composes them into a stable response contract.
//!
//! Backends are selected by configuration and injected at construction time;
//! calling code never branches on backend identity.

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod highlight;
pub mod normalize;
pub mod orchestrator;
pub mod sequence;
pub mod store;
pub mod suggest;

// Re-export commonly used types
pub use backend::{IndexBackend, IndexConfig, MemoryBackend, RelationalBackend, RelationalConfig, SearchBackend};
pub use config::{BackendKind, SearchConfig};
pub use controller::QueryController;
pub use error::{BackendResult, SearchError};
pub use highlight::{build_highlight, escape_html, result_candidates, Highlight};
pub use normalize::normalize;
pub use orchestrator::{RawSearchParams, SearchOrchestrator, SearchOutcome};
pub use sequence::{Debouncer, RequestSequence, SeqToken};
pub use store::DirectoryStore;
pub use suggest::SuggestionEngine;
