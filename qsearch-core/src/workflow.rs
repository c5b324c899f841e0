//! The two user-facing workflows: loading data and asking questions.
//!
//! The upload workflow adds the safety checks the vector client does not do
//! on its own: it never writes into a collection that already holds points,
//! and it verifies the stored count once the batch is written.
//!
//! # Upload Flow
//!
//! ```text
//! fetch records → ensure collection → count == 0? → upsert batch → count == len?
//! ```

use crate::error::{IntegrityError, Result};
use crate::session::Session;
use crate::source::RecordSource;
use crate::vector::{SearchResult, VectorClient};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub collection: String,
    pub uploaded: u64,
}

/// Runs the upload and query workflows against one vector client.
///
/// Each call is independent; a failed upload leaves nothing to clean up
/// locally.
#[derive(Clone)]
pub struct Workflow {
    client: VectorClient,
    source: Arc<dyn RecordSource>,
    embedding_key: String,
}

impl Workflow {
    /// # Arguments
    ///
    /// * `client` - Vector client used for every storage and embedding call
    /// * `source` - Where upload records come from
    /// * `embedding_key` - Record field that is embedded
    pub fn new(client: VectorClient, source: Arc<dyn RecordSource>, embedding_key: impl Into<String>) -> Self {
        Self {
            client,
            source,
            embedding_key: embedding_key.into(),
        }
    }

    /// Loads all source records into the session's collection.
    ///
    /// # Errors
    ///
    /// - The source cannot be fetched or contains invalid records
    /// - The collection cannot be created ([`IntegrityError::CollectionUnavailable`])
    /// - The collection already holds points ([`IntegrityError::CollectionNotEmpty`]);
    ///   nothing is embedded or written in that case
    /// - The count after writing differs from the number of records
    ///   ([`IntegrityError::CountMismatch`])
    /// - Any embedding or storage call fails
    pub async fn upload(&self, session: &Session) -> Result<UploadReport> {
        let collection = session.collection_name();

        let records = self.source.fetch().await?;

        if !self.client.ensure_collection(collection).await? {
            return Err(IntegrityError::CollectionUnavailable(collection.to_string()).into());
        }

        let existing = self.client.count_points(collection).await?;
        if existing > 0 {
            warn!(collection, points = existing, "Refusing to upload into non-empty collection");
            return Err(IntegrityError::CollectionNotEmpty {
                collection: collection.to_string(),
                points: existing,
            }
            .into());
        }

        self.client
            .upsert_batch(collection, &records, &self.embedding_key)
            .await?;

        let stored = self.client.count_points(collection).await?;
        let expected = records.len() as u64;
        if stored != expected {
            return Err(IntegrityError::CountMismatch {
                collection: collection.to_string(),
                stored,
                expected,
            }
            .into());
        }

        info!(collection, points = stored, "Upload complete");
        Ok(UploadReport {
            collection: collection.to_string(),
            uploaded: stored,
        })
    }

    /// Returns the records closest to `question`, limited by the session.
    pub async fn ask(&self, session: &Session, question: &str) -> Result<Vec<SearchResult>> {
        let results = self
            .client
            .search_nearest(session.collection_name(), question, session.answer_limit())
            .await?;
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use crate::source::SourceError;
    use crate::testing::{capitals, KeywordProvider, MemoryStore, StaticSource, CAPITAL_KEYWORDS};
    use crate::vector::{Embedder, Record};

    struct Fixture {
        store: Arc<MemoryStore>,
        provider: Arc<KeywordProvider>,
        source: Arc<StaticSource>,
        workflow: Workflow,
    }

    fn fixture(store: MemoryStore, records: Vec<Record>) -> Fixture {
        let store = Arc::new(store);
        let provider = Arc::new(KeywordProvider::new(CAPITAL_KEYWORDS));
        let source = Arc::new(StaticSource::new(records));
        let embedder = Embedder::new(provider.clone(), "text-embedding-ada-002", CAPITAL_KEYWORDS.len());
        let client = VectorClient::new(store.clone(), embedder);
        let workflow = Workflow::new(client, source.clone(), "info");

        Fixture {
            store,
            provider,
            source,
            workflow,
        }
    }

    fn session(collection: &str, limit: u64) -> Session {
        Session::new(collection, limit)
    }

    #[tokio::test]
    async fn test_upload_then_ask_capital_of_france() {
        let f = fixture(MemoryStore::new(), capitals());
        let session = session("capitals", 1);

        let report = f.workflow.upload(&session).await.unwrap();
        assert_eq!(
            report,
            UploadReport {
                collection: "capitals".to_string(),
                uploaded: 2
            }
        );

        let answers = f.workflow.ask(&session, "capital of France").await.unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].record, capitals()[0]);
    }

    #[tokio::test]
    async fn test_upload_into_non_empty_collection_is_refused() {
        let f = fixture(
            MemoryStore::new().with_points("capitals", CAPITAL_KEYWORDS.len() as u64, 3),
            capitals(),
        );

        let err = f.workflow.upload(&session("capitals", 1)).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Integrity(IntegrityError::CollectionNotEmpty { points: 3, .. })
        ));
        assert_eq!(err.kind(), ErrorKind::DataIntegrity);
        assert_eq!(f.store.upsert_calls(), 0);
        assert_eq!(f.provider.calls(), 0);
        assert_eq!(f.store.points("capitals").len(), 3);
    }

    #[tokio::test]
    async fn test_upload_detects_dropped_points() {
        let f = fixture(MemoryStore::new().dropping(1), capitals());

        let err = f.workflow.upload(&session("capitals", 1)).await.unwrap_err();

        match err {
            Error::Integrity(IntegrityError::CountMismatch { stored, expected, .. }) => {
                assert_eq!(stored, 1);
                assert_eq!(expected, 2);
            }
            other => panic!("Expected CountMismatch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_reports_unavailable_collection() {
        let f = fixture(MemoryStore::new().refusing_create(), capitals());

        let err = f.workflow.upload(&session("capitals", 1)).await.unwrap_err();

        assert!(matches!(err, Error::Integrity(IntegrityError::CollectionUnavailable(ref name)) if name == "capitals"));
        assert_eq!(f.store.upsert_calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_twice_second_is_refused() {
        let f = fixture(MemoryStore::new(), capitals());
        let session = session("capitals", 1);

        f.workflow.upload(&session).await.unwrap();
        let err = f.workflow.upload(&session).await.unwrap_err();

        assert!(matches!(err, Error::Integrity(IntegrityError::CollectionNotEmpty { points: 2, .. })));
        assert_eq!(f.store.upsert_calls(), 1);
        assert_eq!(f.source.fetches(), 2);
    }

    #[tokio::test]
    async fn test_ask_uses_session_limit() {
        let f = fixture(MemoryStore::new(), capitals());
        f.workflow.upload(&session("capitals", 1)).await.unwrap();

        let answers = f.workflow.ask(&session("capitals", 5), "capital").await.unwrap();
        assert_eq!(answers.len(), 2);
    }

    #[tokio::test]
    async fn test_ask_missing_collection_is_connectivity_error() {
        let f = fixture(MemoryStore::new(), capitals());

        let err = f.workflow.ask(&session("nowhere", 1), "capital").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connectivity);
    }

    #[test]
    fn test_source_error_kind() {
        let err: Error = SourceError::InvalidRecord {
            index: 4,
            reason: "missing field 'info'".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::DataIntegrity);
    }
}
