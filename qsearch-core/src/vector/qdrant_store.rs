//! Qdrant vector database storage implementation.
//!
//! Connects to a Qdrant server (local or cloud) over gRPC and maps records
//! to Qdrant payloads and back.

use super::store::VectorStore;
use super::types::{Point, Record, SearchResult};
use anyhow::{Context, Result};
use async_trait::async_trait;
use qdrant_client::{
    Qdrant,
    qdrant::{
        value::Kind, CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder,
        UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
    },
};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Qdrant-based vector store for record embeddings.
///
/// Records are stored as flat string payloads next to their vectors. Point
/// ids are the UUIDs generated for each [`Point`].
#[derive(Clone)]
pub struct QdrantStore {
    client: Arc<Qdrant>,
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn collection_exists(&self, collection: &str) -> Result<bool> {
        self.client
            .collection_exists(collection)
            .await
            .context("Failed to check collection")
    }

    async fn create_collection(&self, collection: &str, vector_size: u64) -> Result<()> {
        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection)
                    .vectors_config(VectorParamsBuilder::new(vector_size, Distance::Cosine)),
            )
            .await
            .context("Failed to create collection")?;

        Ok(())
    }

    /// Exact point count. The collection info count is only an estimate.
    async fn count(&self, collection: &str) -> Result<u64> {
        let response = self
            .client
            .count(CountPointsBuilder::new(collection).exact(true))
            .await
            .context("Failed to count points")?;

        Ok(response.result.map(|r| r.count).unwrap_or(0))
    }

    async fn upsert(&self, collection: &str, points: Vec<Point>) -> Result<()> {
        let points: Vec<PointStruct> = points
            .into_iter()
            .map(|point| {
                PointStruct::new(
                    point.id.to_string(),
                    point.vector,
                    record_to_payload(&point.payload),
                )
            })
            .collect();

        debug!(collection, points = points.len(), "Upserting points");

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
            .await
            .context("Failed to upsert points")?;

        Ok(())
    }

    async fn search(&self, collection: &str, vector: Vec<f32>, limit: u64) -> Result<Vec<SearchResult>> {
        let search_result = self
            .client
            .search_points(SearchPointsBuilder::new(collection, vector, limit).with_payload(true))
            .await
            .context("Failed to search points")?;

        let results = search_result
            .result
            .into_iter()
            .map(|point| SearchResult {
                record: payload_to_record(point.payload),
                score: point.score,
            })
            .collect();

        Ok(results)
    }
}

impl QdrantStore {
    /// Connects to the Qdrant server at `url`.
    ///
    /// # Arguments
    ///
    /// * `url` - gRPC endpoint, e.g. `http://localhost:6334`
    /// * `api_key` - API key for Qdrant Cloud
    /// * `timeout_secs` - Per-request timeout
    pub fn connect(url: &str, api_key: &SecretString, timeout_secs: u64) -> Result<Self> {
        let client = Qdrant::from_url(url)
            .api_key(api_key.expose_secret().to_string())
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to connect to Qdrant server")?;

        Ok(Self {
            client: Arc::new(client),
        })
    }
}

fn record_to_payload(record: &Record) -> HashMap<String, QdrantValue> {
    record
        .iter()
        .map(|(k, v)| (k.to_string(), QdrantValue::from(v.to_string())))
        .collect()
}

// Non-string scalars only appear if something else wrote to the collection.
fn payload_to_record(payload: HashMap<String, QdrantValue>) -> Record {
    payload
        .into_iter()
        .filter_map(|(key, value)| {
            let text = match value.kind? {
                Kind::StringValue(s) => s,
                Kind::IntegerValue(i) => i.to_string(),
                Kind::DoubleValue(f) => f.to_string(),
                Kind::BoolValue(b) => b.to_string(),
                _ => return None,
            };
            Some((key, text))
        })
        .collect()
}
