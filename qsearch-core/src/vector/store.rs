//! Vector store abstraction.
//!
//! This module provides the interface the vector client uses to talk to a
//! vector database. [`QdrantStore`](super::QdrantStore) is the production
//! implementation.

use super::types::{Point, SearchResult};
use anyhow::Result;
use async_trait::async_trait;

/// Unified interface for vector database operations.
///
/// Every method addresses a collection by name and performs exactly one
/// request against the backend. Nothing is retried.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Returns whether a collection with this name exists.
    async fn collection_exists(&self, collection: &str) -> Result<bool>;

    /// Creates a collection using cosine distance and `vector_size` dimensions.
    ///
    /// Creating a collection that already exists is an error.
    async fn create_collection(&self, collection: &str, vector_size: u64) -> Result<()>;

    /// Returns the number of points stored in the collection.
    async fn count(&self, collection: &str) -> Result<u64>;

    /// Writes all points in a single request and waits until they are applied.
    async fn upsert(&self, collection: &str, points: Vec<Point>) -> Result<()>;

    /// Searches for the most similar points using vector similarity.
    ///
    /// # Arguments
    ///
    /// * `vector` - The query embedding
    /// * `limit` - Maximum number of results to return
    ///
    /// # Returns
    ///
    /// Search results with their payloads, sorted by descending similarity score.
    async fn search(&self, collection: &str, vector: Vec<f32>, limit: u64) -> Result<Vec<SearchResult>>;
}
