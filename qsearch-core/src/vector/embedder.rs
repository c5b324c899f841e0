//! Embedding generation using embedding providers.
//!
//! This module converts text into vector embeddings with a fixed model and
//! checks that every vector fits the collection it is meant for.

use crate::provider::{EmbeddingProvider, ProviderError};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during embedding generation.
#[derive(Debug, Error)]
pub enum EmbedderError {
    /// The provider API returned an error.
    #[error("Failed to request embeddings from the embeddings API: {0}")]
    Provider(#[from] ProviderError),

    /// The provider returned a vector of the wrong length.
    #[error("Embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Result type for embedding operations.
pub type Result<T> = std::result::Result<T, EmbedderError>;

/// Generates vector embeddings for text using a provider embedding model.
///
/// Similar texts produce similar embeddings, as measured by cosine similarity.
/// The default model, `text-embedding-ada-002`, returns 1536-dimensional vectors.
#[derive(Clone)]
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
    model: String,
    dimension: usize,
}

impl Embedder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            provider,
            model: model.into(),
            dimension,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Generates a vector embedding for the given text.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The provider API is unreachable or rejects the request
    /// - The response does not contain an embedding
    /// - The embedding length differs from the configured dimension
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.provider.embed(text, &self.model).await?;

        if embedding.len() != self.dimension {
            return Err(EmbedderError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        Ok(embedding)
    }
}
