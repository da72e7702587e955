//! HTTP embedding provider implementation
//!
//! Implements `EmbeddingProvider` using the OpenAI `/v1/embeddings` endpoint
//! (or any server speaking the same format, e.g. LiteLLM or a local proxy).
//!
//! Configuration comes from [`Config`](crate::Config):
//! - `OPENAI_API_KEY` (required)
//! - `EMBEDDING_URL` (default: `https://api.openai.com/v1/embeddings`)
//! - `EMBEDDING_MODEL` (default: `text-embedding-3-small`)

use super::traits::EmbeddingProvider;
use crate::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default OpenAI embeddings endpoint
pub const DEFAULT_EMBEDDING_URL: &str = "https://api.openai.com/v1/embeddings";

/// Default embedding model (1536 dimensions)
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// HTTP-based embedding provider using the OpenAI `/v1/embeddings` API format.
///
/// Thread-safe and cheaply cloneable (shares the reqwest client internally).
/// No timeout is configured beyond reqwest's defaults.
#[derive(Clone)]
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: String,
}

/// OpenAI-compatible embedding request
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    encoding_format: &'static str,
}

/// OpenAI-compatible embedding response
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI-compatible error response
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl HttpEmbeddingProvider {
    /// Create a new HTTP embedding provider with explicit configuration.
    ///
    /// # Arguments
    ///
    /// * `url` - The embedding API endpoint (e.g., `https://api.openai.com/v1/embeddings`)
    /// * `model` - The model name to use (e.g., `text-embedding-3-small`)
    /// * `api_key` - Bearer credential sent in the `Authorization` header
    pub fn new(url: String, model: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            model,
            api_key,
        }
    }

    /// Create a provider from the loaded application config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.embedding_url.clone(),
            config.embedding_model.clone(),
            config.openai_api_key.clone(),
        )
    }

    /// The endpoint this provider posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let request_body = EmbeddingRequest {
            model: &self.model,
            input: text,
            encoding_format: "float",
        };

        debug!(model = %self.model, chars = text.chars().count(), "Requesting embedding");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .with_context(|| format!("Failed to connect to embedding API at {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse OpenAI-style error
            if let Ok(ErrorResponse {
                error: Some(detail),
            }) = serde_json::from_str::<ErrorResponse>(&body)
            {
                anyhow::bail!(
                    "Embedding API error ({}): {}",
                    status.as_u16(),
                    detail.message
                );
            }
            anyhow::bail!("Embedding API returned {}: {}", status.as_u16(), body);
        }

        let resp: EmbeddingResponse = response
            .json()
            .await
            .context("Failed to parse embedding API response")?;

        resp.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .context("Embedding API returned empty response")
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchDefaults;

    #[test]
    fn test_new_explicit_config() {
        let provider = HttpEmbeddingProvider::new(
            "http://localhost:8080/embed".to_string(),
            "test-model".to_string(),
            "key-123".to_string(),
        );
        assert_eq!(provider.url(), "http://localhost:8080/embed");
        assert_eq!(provider.model, "test-model");
        assert_eq!(provider.api_key, "key-123");
        assert_eq!(provider.model_name(), "test-model");
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            openai_api_key: "sk-test".into(),
            embedding_url: DEFAULT_EMBEDDING_URL.into(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.into(),
            supabase_url: "https://proj.supabase.co".into(),
            supabase_key: "anon".into(),
            search: SearchDefaults::default(),
        };
        let provider = HttpEmbeddingProvider::from_config(&config);
        assert_eq!(provider.url(), "https://api.openai.com/v1/embeddings");
        assert_eq!(provider.model_name(), "text-embedding-3-small");
        assert_eq!(provider.api_key, "sk-test");
    }

    #[test]
    fn test_request_body_shape() {
        let body = EmbeddingRequest {
            model: DEFAULT_EMBEDDING_MODEL,
            input: "credit card rewards",
            encoding_format: "float",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "text-embedding-3-small",
                "input": "credit card rewards",
                "encoding_format": "float"
            })
        );
    }

    #[test]
    fn test_error_response_parsing() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        let parsed: ErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.unwrap().message, "Incorrect API key provided");
    }
}
