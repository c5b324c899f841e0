//! Retrieval of source records over HTTP.
//!
//! The source is a JSON array of flat objects. Records are validated here so
//! the rest of the crate can rely on string fields and a present embedding key.

use crate::vector::Record;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to retrieve JSON data from URL '{url}' - {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to retrieve JSON data from URL '{url}' - server returned {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse JSON data from URL '{url}' - {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid record at position {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// Somewhere records can be loaded from.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Record>>;
}

/// Downloads records with a single GET request.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    embedding_key: String,
    http_client: reqwest::Client,
}

impl HttpSource {
    /// # Arguments
    ///
    /// * `url` - Address of the JSON array
    /// * `embedding_key` - Field every record must carry
    pub fn new(url: impl Into<String>, embedding_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            embedding_key: embedding_key.into(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RecordSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<Record>> {
        debug!(url = %self.url, "Fetching source records");

        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| SourceError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| SourceError::Request {
            url: self.url.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&body).map_err(|source| SourceError::Json {
            url: self.url.clone(),
            source,
        })?;

        let records = parse_records(value, &self.embedding_key)?;
        info!(url = %self.url, records = records.len(), "Fetched source records");
        Ok(records)
    }
}

/// Validates a JSON document into records.
///
/// The document must be an array of objects. String values are kept as-is,
/// numbers and booleans become their JSON text, and anything else is
/// rejected. Every record must contain `embedding_key` with a non-empty
/// value.
pub fn parse_records(value: Value, embedding_key: &str) -> Result<Vec<Record>> {
    let Value::Array(items) = value else {
        return Err(SourceError::InvalidRecord {
            index: 0,
            reason: "expected a JSON array of objects".to_string(),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| parse_record(index, item, embedding_key))
        .collect()
}

fn parse_record(index: usize, item: Value, embedding_key: &str) -> Result<Record> {
    let invalid = |reason: String| SourceError::InvalidRecord { index, reason };

    let Value::Object(map) = item else {
        return Err(invalid("expected a JSON object".to_string()));
    };

    let record = map
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(invalid(format!(
                        "field '{}' must be a string, got {}",
                        key,
                        json_kind(&other)
                    )))
                }
            };
            Ok((key, text))
        })
        .collect::<Result<Record>>()?;

    match record.embedding_text(embedding_key) {
        Some(text) if !text.trim().is_empty() => Ok(record),
        Some(_) => Err(invalid(format!("field '{}' is empty", embedding_key))),
        None => Err(invalid(format!("missing field '{}'", embedding_key))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
