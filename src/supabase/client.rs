//! Supabase PostgREST client for the similarity RPC

use super::models::{MatchNotesRequest, NoteMatch, MATCH_NOTES_RPC};
use super::traits::SimilaritySearch;
use crate::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

/// Client calling the `match_notes_by_embedding` stored procedure.
///
/// The same key is sent as `apikey` and as the bearer token, which is what
/// PostgREST expects for service/anon keys.
#[derive(Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    rpc_url: String,
    key: String,
}

impl SupabaseClient {
    /// Create a client for the project at `base_url` (e.g. `https://xyz.supabase.co`).
    pub fn new(base_url: &str, key: &str) -> Self {
        let rpc_url = format!(
            "{}/rest/v1/rpc/{}",
            base_url.trim_end_matches('/'),
            MATCH_NOTES_RPC
        );

        Self {
            client: reqwest::Client::new(),
            rpc_url,
            key: key.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.supabase_url, &config.supabase_key)
    }

    /// Full URL of the RPC endpoint
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

#[async_trait]
impl SimilaritySearch for SupabaseClient {
    async fn match_notes(
        &self,
        query_embedding: &[f32],
        match_count: u32,
        threshold: f64,
    ) -> Result<Vec<NoteMatch>> {
        let body = MatchNotesRequest {
            match_count,
            query_embedding,
            threshold,
        };

        debug!(
            match_count,
            threshold,
            dimensions = query_embedding.len(),
            "Calling {}",
            MATCH_NOTES_RPC
        );

        let response = self
            .client
            .post(&self.rpc_url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to connect to Supabase at {}", self.rpc_url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Supabase RPC {} returned {}: {}",
                MATCH_NOTES_RPC,
                status.as_u16(),
                body
            );
        }

        let matches: Vec<NoteMatch> = response
            .json()
            .await
            .context("Failed to parse Supabase RPC response")?;

        debug!(count = matches.len(), "Supabase returned matches");

        Ok(matches)
    }
}
