//! Mock embedding provider for tests
//!
//! Produces deterministic embeddings from text hashes, ensuring:
//! - Same text → same embedding (reproducible tests)
//! - Different texts → different embeddings
//! - Configurable dimensions (1536 matches `text-embedding-3-small`)
//!
//! Can also be built in a failing mode to exercise the error envelope.

use super::traits::EmbeddingProvider;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Deterministic mock embedding provider for tests.
///
/// # Example
///
/// ```rust
/// use roam_page_search::embeddings::MockEmbeddingProvider;
/// use roam_page_search::embeddings::EmbeddingProvider;
///
/// # tokio_test::block_on(async {
/// let provider = MockEmbeddingProvider::new(1536);
/// let embedding = provider.embed_text("hello world").await.unwrap();
/// assert_eq!(embedding.len(), 1536);
///
/// // Same text → same embedding
/// let embedding2 = provider.embed_text("hello world").await.unwrap();
/// assert_eq!(embedding, embedding2);
/// assert_eq!(provider.call_count(), 2);
/// # });
/// ```
#[derive(Debug)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MockEmbeddingProvider {
    /// Create a new mock provider with the given embedding dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock provider whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            dimensions: 0,
            failure: Some(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `embed_text` calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Generate a deterministic embedding from text using hash spreading.
    ///
    /// Each dimension rehashes the previous hash, is mapped to [-1.0, 1.0],
    /// and the whole vector is L2-normalized.
    fn hash_to_embedding(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut hash = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimensions);
        for _ in 0..self.dimensions {
            let value = (hash as f64 / u64::MAX as f64) * 2.0 - 1.0;
            embedding.push(value as f32);

            let mut h = DefaultHasher::new();
            hash.hash(&mut h);
            hash = h.finish();
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(ref message) = self.failure {
            anyhow::bail!("{}", message);
        }
        Ok(self.hash_to_embedding(text))
    }

    fn model_name(&self) -> &str {
        "mock-hash-embedding"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deterministic_embeddings() {
        let provider = MockEmbeddingProvider::new(1536);
        let emb1 = provider.embed_text("hello world").await.unwrap();
        let emb2 = provider.embed_text("hello world").await.unwrap();
        assert_eq!(emb1, emb2, "Same text must produce identical embeddings");
    }

    #[tokio::test]
    async fn test_different_texts_different_embeddings() {
        let provider = MockEmbeddingProvider::new(64);
        let emb1 = provider.embed_text("hello").await.unwrap();
        let emb2 = provider.embed_text("world").await.unwrap();
        assert_ne!(emb1, emb2);
    }

    #[tokio::test]
    async fn test_l2_normalized() {
        let provider = MockEmbeddingProvider::new(1536);
        let emb = provider.embed_text("normalize me").await.unwrap();
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!(
            (norm - 1.0).abs() < 1e-4,
            "Embedding should be L2-normalized, got norm = {}",
            norm
        );
    }

    #[tokio::test]
    async fn test_failing_mode_counts_calls() {
        let provider = MockEmbeddingProvider::failing("quota exceeded");
        let err = provider.embed_text("anything").await.unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_model_name() {
        let provider = MockEmbeddingProvider::new(8);
        assert_eq!(provider.model_name(), "mock-hash-embedding");
    }
}
