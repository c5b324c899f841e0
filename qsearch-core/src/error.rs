use crate::config::ConfigError;
use crate::source::SourceError;
use crate::vector::{EmbedderError, StoreError};
use thiserror::Error;

/// Guard failures raised by the upload workflow.
#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("Collection '{0}' does not exist. Cannot continue.")]
    CollectionUnavailable(String),

    #[error("Collection '{collection}' is not empty ({points} points). Clear collection before uploading.")]
    CollectionNotEmpty { collection: String, points: u64 },

    #[error("Not all data was uploaded into collection '{collection}' {stored}/{expected}")]
    CountMismatch {
        collection: String,
        stored: u64,
        expected: u64,
    },
}

/// Broad category of an [`Error`], used to decide how to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed configuration; fatal at startup.
    Configuration,
    /// A network failure or a rejection by one of the external services.
    Connectivity,
    /// Data that breaks an invariant of the upload or the records.
    DataIntegrity,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Configuration,
            Error::Source(SourceError::InvalidRecord { .. }) => ErrorKind::DataIntegrity,
            Error::Source(_) => ErrorKind::Connectivity,
            Error::Store(StoreError::Embedding(EmbedderError::DimensionMismatch { .. }))
            | Error::Store(StoreError::CollectionEmbedding {
                source: EmbedderError::DimensionMismatch { .. },
                ..
            })
            | Error::Store(StoreError::MissingEmbeddingText { .. }) => ErrorKind::DataIntegrity,
            Error::Store(_) => ErrorKind::Connectivity,
            Error::Integrity(_) => ErrorKind::DataIntegrity,
        }
    }
}
