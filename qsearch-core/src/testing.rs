//! In-memory fakes for the external services, shared by unit tests.

use crate::provider::{self, EmbeddingProvider, ProviderError};
use crate::source::{self, RecordSource};
use crate::vector::{Point, Record, SearchResult, VectorStore};
use anyhow::{anyhow, bail};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Embeds text as a bag of keywords: one dimension per keyword, 1.0 when present.
pub struct KeywordProvider {
    keywords: Vec<String>,
    fail_on: Option<String>,
    models: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl KeywordProvider {
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            fail_on: None,
            models: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Makes every request whose text contains `marker` fail.
    pub fn failing_on(mut self, marker: &str) -> Self {
        self.fail_on = Some(marker.to_string());
        self
    }

    pub fn models_seen(&self) -> Vec<String> {
        self.models.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordProvider {
    async fn embed(&self, text: &str, model: &str) -> provider::Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.models.lock().unwrap().push(model.to_string());

        if let Some(marker) = &self.fail_on {
            if text.contains(marker.as_str()) {
                return Err(ProviderError::Api {
                    status: 500,
                    body: "upstream failure".to_string(),
                });
            }
        }

        let text = text.to_lowercase();
        Ok(self
            .keywords
            .iter()
            .map(|k| if text.contains(k.as_str()) { 1.0 } else { 0.0 })
            .collect())
    }
}

/// Returns the same vector for every text.
pub struct FixedProvider {
    vector: Vec<f32>,
}

impl FixedProvider {
    pub fn new(vector: Vec<f32>) -> Self {
        Self { vector }
    }
}

#[async_trait]
impl EmbeddingProvider for FixedProvider {
    async fn embed(&self, _text: &str, _model: &str) -> provider::Result<Vec<f32>> {
        Ok(self.vector.clone())
    }
}

struct MemoryCollection {
    vector_size: u64,
    points: Vec<Point>,
}

/// Vector store that keeps collections in memory and behaves like Qdrant for
/// the operations the client uses.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, MemoryCollection>>,
    dropped_per_upsert: usize,
    refuse_create: bool,
    upsert_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates `collection` with `count` unrelated points.
    pub fn with_points(self, collection: &str, vector_size: u64, count: usize) -> Self {
        let points = (0..count)
            .map(|i| {
                Point::new(
                    Record::new().with_field("info", format!("existing {}", i)),
                    vec![0.0; vector_size as usize],
                )
            })
            .collect();
        self.collections
            .lock()
            .unwrap()
            .insert(collection.to_string(), MemoryCollection { vector_size, points });
        self
    }

    /// Silently discards the last `n` points of every upsert.
    pub fn dropping(mut self, n: usize) -> Self {
        self.dropped_per_upsert = n;
        self
    }

    /// Accepts create requests without creating anything.
    pub fn refusing_create(mut self) -> Self {
        self.refuse_create = true;
        self
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn points(&self, collection: &str) -> Vec<Point> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|c| c.points.clone())
            .unwrap_or_default()
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn collection_exists(&self, collection: &str) -> anyhow::Result<bool> {
        Ok(self.collections.lock().unwrap().contains_key(collection))
    }

    async fn create_collection(&self, collection: &str, vector_size: u64) -> anyhow::Result<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.refuse_create {
            return Ok(());
        }

        let mut collections = self.collections.lock().unwrap();
        if collections.contains_key(collection) {
            bail!("Collection `{}` already exists!", collection);
        }
        collections.insert(
            collection.to_string(),
            MemoryCollection {
                vector_size,
                points: Vec::new(),
            },
        );
        Ok(())
    }

    async fn count(&self, collection: &str) -> anyhow::Result<u64> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|c| c.points.len() as u64)
            .ok_or_else(|| anyhow!("Collection `{}` doesn't exist!", collection))
    }

    async fn upsert(&self, collection: &str, mut points: Vec<Point>) -> anyhow::Result<()> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);

        let mut collections = self.collections.lock().unwrap();
        let target = collections
            .get_mut(collection)
            .ok_or_else(|| anyhow!("Collection `{}` doesn't exist!", collection))?;

        if let Some(bad) = points.iter().find(|p| p.vector.len() as u64 != target.vector_size) {
            bail!(
                "Wrong input: Vector dimension error: expected dim: {}, got {}",
                target.vector_size,
                bad.vector.len()
            );
        }

        let keep = points.len().saturating_sub(self.dropped_per_upsert);
        points.truncate(keep);
        target.points.extend(points);
        Ok(())
    }

    async fn search(&self, collection: &str, vector: Vec<f32>, limit: u64) -> anyhow::Result<Vec<SearchResult>> {
        let collections = self.collections.lock().unwrap();
        let target = collections
            .get(collection)
            .ok_or_else(|| anyhow!("Collection `{}` doesn't exist!", collection))?;

        let mut results: Vec<SearchResult> = target
            .points
            .iter()
            .map(|p| SearchResult {
                record: p.payload.clone(),
                score: cosine(&vector, &p.vector),
            })
            .collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(limit as usize);
        Ok(results)
    }
}

/// Record source that serves a fixed list.
pub struct StaticSource {
    records: Vec<Record>,
    fetches: AtomicUsize,
}

impl StaticSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    async fn fetch(&self) -> source::Result<Vec<Record>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.clone())
    }
}

/// The two-record dataset used by the end-to-end scenarios.
pub fn capitals() -> Vec<Record> {
    vec![
        Record::new().with_field("info", "Paris is the capital of France"),
        Record::new().with_field("info", "Tokyo is the capital of Japan"),
    ]
}

/// Keywords that separate the [`capitals`] records.
pub const CAPITAL_KEYWORDS: &[&str] = &["capital", "france", "paris", "japan", "tokyo"];
