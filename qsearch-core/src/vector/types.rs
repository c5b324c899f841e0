use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One unit of source knowledge, e.g. a question/answer pair.
///
/// Keys and values are plain strings. Which key feeds the embedding is chosen
/// by the caller at upload time; see [`Record::embedding_text`].
///
/// # Example
///
/// ```
/// # use qsearch_core::vector::Record;
/// let record = Record::new()
///     .with_field("info", "Paris is the capital of France")
///     .with_field("url", "https://example.com/paris");
///
/// assert_eq!(record.get("info"), Some("Paris is the capital of France"));
/// assert_eq!(record.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns the text used for the embedding, if `key` is present.
    pub fn embedding_text(&self, key: &str) -> Option<&str> {
        self.get(key)
    }

    /// Fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// The persisted unit in the vector store.
///
/// The id is generated when the point is built and never reused.
#[derive(Debug, Clone)]
pub struct Point {
    pub id: Uuid,
    pub payload: Record,
    pub vector: Vec<f32>,
}

impl Point {
    /// Creates a point with a fresh random id.
    pub fn new(payload: Record, vector: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload,
            vector,
        }
    }
}

/// A search result containing a stored record and its similarity score.
///
/// Returned by vector search operations, ordered by descending similarity score.
/// With cosine distance the score ranges from -1.0 to 1.0; higher is closer.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub record: Record,
    pub score: f32,
}
