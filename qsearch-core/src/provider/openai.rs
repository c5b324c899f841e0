//! OpenAI provider implementation.
//!
//! Talks to any endpoint that speaks the OpenAI `/embeddings` API.

use super::types::*;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

/// OpenAI HTTP API provider.
#[derive(Debug)]
pub struct OpenAiProvider {
    base_url: String,
    api_key: SecretString,
    http_client: reqwest::Client,
}

impl OpenAiProvider {
    /// Creates a new provider for `base_url` (e.g. `https://api.openai.com/v1`).
    pub fn new(base_url: impl Into<String>, api_key: &SecretString) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: SecretString::from(api_key.expose_secret().to_string()),
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
    async fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>> {
        let url = format!("{}/embeddings", self.base_url);

        let embed_request = EmbedRequest {
            model: model.to_string(),
            input: text.to_string(),
        };

        debug!(model, chars = text.len(), "Requesting embedding");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&embed_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let embed_response: EmbedResponse = serde_json::from_str(&body)?;

        let mut data = embed_response.data;
        data.sort_by_key(|d| d.index);

        data.into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(ProviderError::NoEmbeddings)
    }
}
