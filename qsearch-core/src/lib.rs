//! qsearch-core - semantic search over question/answer records
//!
//! Provides the building blocks of the `qsearch` tool:
//! - Embedding provider abstraction (OpenAI-compatible APIs)
//! - Vector client over Qdrant (collections, batch upsert, nearest search)
//! - Record source that downloads and validates the JSON data
//! - Upload and query workflows with their safety checks
//! - Configuration management
//!
//! ## Primary API
//!
//! Build a [`VectorClient`], wrap it in a [`Workflow`] and drive it with a
//! [`Session`].

// Public modules
pub mod config;
pub mod error;
pub mod provider;
pub mod session;
pub mod source;
pub mod vector;
pub mod workflow;

#[cfg(test)]
mod testing;

// Public exports
pub use config::{Config, ConfigError, Credentials};
pub use error::{Error, ErrorKind, IntegrityError, Result};
pub use session::{InputError, Session};
pub use source::{HttpSource, RecordSource, SourceError};
pub use vector::{Embedder, QdrantStore, Record, SearchResult, StoreError, VectorClient, VectorStore};
pub use workflow::{UploadReport, Workflow};

// Provider exports
pub use provider::{EmbeddingProvider, OpenAiProvider, ProviderError};

use std::sync::Arc;

/// Connects to the production services described by `config` and `credentials`.
///
/// Builds a Qdrant-backed [`VectorClient`] with the OpenAI embedder and an
/// [`HttpSource`] for uploads.
pub fn connect(config: &Config, credentials: &Credentials) -> anyhow::Result<Workflow> {
    let store = QdrantStore::connect(
        &credentials.qdrant_url,
        &credentials.qdrant_api_key,
        config.storage.timeout_secs,
    )?;

    let provider = OpenAiProvider::new(
        config.embedding.base_url.clone(),
        &credentials.openai_api_key,
    );
    let embedder = Embedder::new(
        Arc::new(provider),
        config.embedding.model.clone(),
        config.embedding.dimension as usize,
    );

    let client = VectorClient::new(Arc::new(store), embedder);
    let source = HttpSource::new(config.source.url.clone(), config.source.embedding_key.clone());

    Ok(Workflow::new(client, Arc::new(source), config.source.embedding_key.clone()))
}
