//! `PageSearcher`: the embed-then-match pipeline behind the MCP tool

use super::models::SearchEnvelope;
use super::{SearchDefaults, SearchError};
use crate::embeddings::{EmbeddingProvider, HttpEmbeddingProvider};
use crate::supabase::{NoteMatch, SimilaritySearch, SupabaseClient};
use crate::Config;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Semantic page search over Roam pages stored in Supabase.
///
/// Holds long-lived client handles only; every call is independent, so one
/// searcher can serve concurrent invocations.
#[derive(Clone)]
pub struct PageSearcher {
    embeddings: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn SimilaritySearch>,
    defaults: SearchDefaults,
}

impl PageSearcher {
    pub fn new(
        embeddings: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn SimilaritySearch>,
        defaults: SearchDefaults,
    ) -> Self {
        Self {
            embeddings,
            store,
            defaults,
        }
    }

    /// Build a searcher backed by the real OpenAI and Supabase clients.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(HttpEmbeddingProvider::from_config(config)),
            Arc::new(SupabaseClient::from_config(config)),
            config.search,
        )
    }

    pub fn defaults(&self) -> SearchDefaults {
        self.defaults
    }

    /// Embed `text` with the configured model.
    pub async fn get_embedding(&self, text: &str) -> Result<Vec<f32>, SearchError> {
        self.embeddings
            .embed_text(text)
            .await
            .map_err(SearchError::Embedding)
    }

    /// Ask the backend for pages similar to `query_embedding`.
    pub async fn search_similar_pages(
        &self,
        query_embedding: &[f32],
        match_count: u32,
        threshold: f64,
    ) -> Result<Vec<NoteMatch>, SearchError> {
        self.store
            .match_notes(query_embedding, match_count, threshold)
            .await
            .map_err(SearchError::Search)
    }

    /// Run the full pipeline and return the envelope.
    ///
    /// The search call only happens once the embedding succeeded.
    pub async fn search(
        &self,
        query: &str,
        match_count: Option<u32>,
        threshold: Option<f64>,
    ) -> SearchEnvelope {
        let match_count = match_count.unwrap_or(self.defaults.match_count);
        let threshold = threshold.unwrap_or(self.defaults.threshold);

        debug!(match_count, threshold, "Searching Roam pages");

        match self.run(query, match_count, threshold).await {
            Ok(pages) => {
                info!(total_matches = pages.len(), "Page search completed");
                SearchEnvelope::found(query, pages)
            }
            Err(e) => {
                warn!("Page search failed: {}", e);
                SearchEnvelope::failed(query, e)
            }
        }
    }

    /// Tool entry point: pipeline result rendered as pretty JSON text.
    pub async fn search_roam_pages(
        &self,
        query: &str,
        match_count: Option<u32>,
        threshold: Option<f64>,
    ) -> String {
        self.search(query, match_count, threshold).await.to_json()
    }

    async fn run(
        &self,
        query: &str,
        match_count: u32,
        threshold: f64,
    ) -> Result<Vec<NoteMatch>, SearchError> {
        let query_embedding = self.get_embedding(query).await?;
        self.search_similar_pages(&query_embedding, match_count, threshold)
            .await
    }
}
