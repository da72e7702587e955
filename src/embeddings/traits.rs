//! EmbeddingProvider trait definition
//!
//! Defines the abstract interface for vector embedding generation.
//! Async trait + Send + Sync for `Arc<dyn EmbeddingProvider>` usage.

use anyhow::Result;
use async_trait::async_trait;

/// Abstract interface for generating vector embeddings from text.
///
/// Implementations must be thread-safe (`Send + Sync`) to be shared
/// across async tasks via `Arc<dyn EmbeddingProvider>`.
///
/// # Implementations
///
/// - [`HttpEmbeddingProvider`](super::HttpEmbeddingProvider): HTTP client for any
///   OpenAI-compatible `/v1/embeddings` endpoint
/// - [`MockEmbeddingProvider`](super::MockEmbeddingProvider): deterministic mock
///   that produces consistent embeddings from text hashes (for tests)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate a vector embedding for a single text input.
    ///
    /// The vector is passed through untouched; its length is whatever the
    /// model produces (1536 for `text-embedding-3-small`).
    ///
    /// # Errors
    ///
    /// Returns an error if the embedding generation fails (network error,
    /// API error, malformed response, etc.)
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>>;

    /// The name of the embedding model being used.
    fn model_name(&self) -> &str;
}
