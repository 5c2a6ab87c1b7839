//! Custom Axum extractors.

pub mod query_pairs;

pub use query_pairs::QueryPairs;
