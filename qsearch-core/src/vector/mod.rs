//! Vector storage and semantic search over records.
//!
//! This module wraps the vector database and the embedding provider behind
//! one client so callers work with collections, records and questions
//! instead of raw vectors.
//!
//! # Architecture
//!
//! - [`VectorClient`]: the single entry point used by the workflows
//! - [`Embedder`]: converts text to vector embeddings with a fixed model
//! - [`VectorStore`]: backend interface, implemented by [`QdrantStore`]
//!
//! # How It Works
//!
//! 1. **Upload**: every record gets a fresh UUID and an embedding of its
//!    designated text field; all points go to the store in one request.
//! 2. **Search**: the question is embedded and the store returns the
//!    closest records by cosine similarity.

mod embedder;
mod qdrant_store;
mod store;
mod types;

pub use embedder::{Embedder, EmbedderError};
pub use qdrant_store::QdrantStore;
pub use store::VectorStore;
pub use types::{Point, Record, SearchResult};

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Number of prepared records between two progress log lines.
const PROGRESS_EVERY: usize = 100;

const UPSERT_OPERATION: &str = "upsert points";
const SEARCH_OPERATION: &str = "search for point";

/// Errors raised by [`VectorClient`] operations.
///
/// Each variant names the operation and collection that failed and keeps the
/// underlying cause as its source.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to check whether collection '{collection}' exists - {source}")]
    CollectionExists {
        collection: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Error during creating collection '{collection}' - {source}")]
    CreateCollection {
        collection: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to retrieve collection's '{collection}' points - {source}")]
    CountPoints {
        collection: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Embedding(#[from] EmbedderError),

    /// Embedding failed while preparing a write or a search on `collection`.
    #[error("Failed to {operation} for collection '{collection}' - {source}")]
    CollectionEmbedding {
        operation: &'static str,
        collection: String,
        #[source]
        source: EmbedderError,
    },

    #[error("Failed to upsert points for collection '{collection}' - record {index} has no '{key}' field to embed")]
    MissingEmbeddingText {
        collection: String,
        index: usize,
        key: String,
    },

    #[error("Failed to upsert points for collection '{collection}': {source}")]
    Upsert {
        collection: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to search for point in collection '{collection}' - {source}")]
    Search {
        collection: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Client for one vector database and one embedding model.
///
/// Every operation performs its external calls one after another and fails
/// as a whole; nothing is retried.
#[derive(Clone)]
pub struct VectorClient {
    store: Arc<dyn VectorStore>,
    embedder: Embedder,
}

impl VectorClient {
    pub fn new(store: Arc<dyn VectorStore>, embedder: Embedder) -> Self {
        Self { store, embedder }
    }

    /// Vector size used for new collections. Matches the embedding dimension.
    pub fn vector_size(&self) -> u64 {
        self.embedder.dimension() as u64
    }

    pub async fn collection_exists(&self, collection: &str) -> Result<bool> {
        self.store
            .collection_exists(collection)
            .await
            .map_err(|source| StoreError::CollectionExists {
                collection: collection.to_string(),
                source,
            })
    }

    /// Creates a collection with cosine distance.
    ///
    /// Returns whether the collection exists after creation, as reported by a
    /// separate existence check. Creating a name that already exists fails
    /// and leaves the existing collection untouched.
    pub async fn create_collection(&self, collection: &str) -> Result<bool> {
        self.store
            .create_collection(collection, self.vector_size())
            .await
            .map_err(|source| StoreError::CreateCollection {
                collection: collection.to_string(),
                source,
            })?;

        info!(collection, vector_size = self.vector_size(), "Created collection");
        self.collection_exists(collection).await
    }

    /// Creates the collection if it is missing.
    ///
    /// Returns `true` when the collection already existed or was created, and
    /// `false` only when creation was attempted but the collection is still
    /// not there.
    pub async fn ensure_collection(&self, collection: &str) -> Result<bool> {
        if self.collection_exists(collection).await? {
            debug!(collection, "Collection already exists");
            return Ok(true);
        }
        self.create_collection(collection).await
    }

    pub async fn count_points(&self, collection: &str) -> Result<u64> {
        self.store
            .count(collection)
            .await
            .map_err(|source| StoreError::CountPoints {
                collection: collection.to_string(),
                source,
            })
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embedder.embed(text).await?)
    }

    async fn embed_for(&self, operation: &'static str, collection: &str, text: &str) -> Result<Vec<f32>> {
        self.embedder
            .embed(text)
            .await
            .map_err(|source| StoreError::CollectionEmbedding {
                operation,
                collection: collection.to_string(),
                source,
            })
    }

    /// Embeds every record and writes all of them in one upsert request.
    ///
    /// Each record gets a freshly generated id; the whole record becomes the
    /// point payload and `embedding_key` selects the text to embed. If any
    /// record cannot be embedded, nothing is written.
    ///
    /// Returns the number of points sent to the store.
    pub async fn upsert_batch(&self, collection: &str, records: &[Record], embedding_key: &str) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut points = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let text = record
                .embedding_text(embedding_key)
                .ok_or_else(|| StoreError::MissingEmbeddingText {
                    collection: collection.to_string(),
                    index,
                    key: embedding_key.to_string(),
                })?;

            let vector = self.embed_for(UPSERT_OPERATION, collection, text).await?;
            points.push(Point::new(record.clone(), vector));

            if points.len() % PROGRESS_EVERY == 0 {
                info!(collection, prepared = points.len(), total = records.len(), "Prepared points");
            }
        }

        let count = points.len();
        self.store
            .upsert(collection, points)
            .await
            .map_err(|source| StoreError::Upsert {
                collection: collection.to_string(),
                source,
            })?;

        info!(collection, points = count, "Upserted points");
        Ok(count)
    }

    /// Finds the records closest to `query`.
    ///
    /// Returns at most `limit` results, highest score first.
    pub async fn search_nearest(&self, collection: &str, query: &str, limit: u64) -> Result<Vec<SearchResult>> {
        let vector = self.embed_for(SEARCH_OPERATION, collection, query).await?;

        let mut results = self
            .store
            .search(collection, vector, limit)
            .await
            .map_err(|source| StoreError::Search {
                collection: collection.to_string(),
                source,
            })?;

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(usize::try_from(limit).unwrap_or(usize::MAX));

        debug!(collection, results = results.len(), "Search finished");
        Ok(results)
    }
}
