//! In-memory mock implementation of SimilaritySearch for testing without Supabase.

use super::models::NoteMatch;
use super::traits::SimilaritySearch;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Parameters received by one `match_notes` call
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCall {
    pub dimensions: usize,
    pub match_count: u32,
    pub threshold: f64,
}

/// Canned-response mock of the similarity RPC.
///
/// Returns the configured matches (or the configured failure) and records
/// every call so tests can assert on forwarded parameters.
pub struct MockSimilaritySearch {
    matches: Vec<NoteMatch>,
    failure: Option<String>,
    calls: RwLock<Vec<MatchCall>>,
}

impl MockSimilaritySearch {
    /// Mock returning `matches` for every call.
    pub fn with_matches(matches: Vec<NoteMatch>) -> Self {
        Self {
            matches,
            failure: None,
            calls: RwLock::new(Vec::new()),
        }
    }

    /// Mock returning an empty result set.
    pub fn empty() -> Self {
        Self::with_matches(Vec::new())
    }

    /// Mock whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            matches: Vec::new(),
            failure: Some(message.into()),
            calls: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of the calls received so far.
    pub async fn calls(&self) -> Vec<MatchCall> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl SimilaritySearch for MockSimilaritySearch {
    async fn match_notes(
        &self,
        query_embedding: &[f32],
        match_count: u32,
        threshold: f64,
    ) -> Result<Vec<NoteMatch>> {
        self.calls.write().await.push(MatchCall {
            dimensions: query_embedding.len(),
            match_count,
            threshold,
        });

        if let Some(ref message) = self.failure {
            anyhow::bail!("{}", message);
        }
        Ok(self.matches.clone())
    }
}
