//! Read-only collaborator record store.
//!
//! The restaurant directory itself (profiles, images, reviews, CRUD) is an
//! external system. The search subsystem consumes it through this narrow
//! interface only: given a slug, return the published restaurant's
//! denormalized display row, ratings included.

use async_trait::async_trait;
use easyeats_core::RestaurantRecord;

use crate::error::BackendResult;

/// Read-only lookups against the directory record store.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Fetch one published restaurant's display row, or None if the slug
    /// is unknown or unpublished.
    async fn restaurant_by_slug(&self, slug: &str) -> BackendResult<Option<RestaurantRecord>>;
}
