//! qsearch - semantic search over question/answer records
//!
//! Convenience wrapper that re-exports the `qsearch-core` API.
//!
//! # Quick Start
//!
//! ```toml
//! [dependencies]
//! qsearch = "0.1"
//! ```

// Re-export core
pub use qsearch_core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use qsearch_core::{
        Config, Credentials, Embedder, EmbeddingProvider, Error, ErrorKind, Record, RecordSource, SearchResult,
        Session, VectorClient, VectorStore, Workflow,
    };
}
