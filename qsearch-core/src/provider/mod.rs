//! Embedding provider abstraction layer.
//!
//! This module defines a common interface for embedding backends so the
//! vector client does not depend on a particular HTTP API.

mod types;
pub mod openai;

// Re-export common types
pub use types::{
    EmbedData,
    EmbedRequest,
    EmbedResponse,
    EmbeddingProvider,
    ProviderError,
    Result,
};

// Re-export provider implementations
pub use openai::OpenAiProvider;
