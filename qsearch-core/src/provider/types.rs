//! Common types for embedding providers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when interacting with a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("No embeddings returned")]
    NoEmbeddings,
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Provider trait for embedding backends.
///
/// One call embeds one text. Implementations do not retry.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for the given text.
    async fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>>;
}

/// Request for generating embeddings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedRequest {
    pub model: String,
    pub input: String,
}

/// Response containing embeddings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    #[serde(default)]
    pub model: String,
    pub data: Vec<EmbedData>,
}

/// A single embedding within an [`EmbedResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedData {
    #[serde(default)]
    pub index: usize,
    pub embedding: Vec<f32>,
}
