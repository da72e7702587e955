//! Trait abstraction for the remote similarity search

use super::models::NoteMatch;
use anyhow::Result;
use async_trait::async_trait;

/// Abstract interface over the server-side similarity search.
///
/// `match_count` and `threshold` are advisory and forwarded verbatim; the
/// backend decides ranking and filtering.
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    /// Return the pages most similar to `query_embedding`, best first.
    async fn match_notes(
        &self,
        query_embedding: &[f32],
        match_count: u32,
        threshold: f64,
    ) -> Result<Vec<NoteMatch>>;
}
