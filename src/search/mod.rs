//! Page search orchestration
//!
//! Composes the embedding provider and the Supabase similarity RPC into the
//! single `search_roam_pages` operation: text → vector → ranked pages → JSON.

pub mod models;
pub mod service;

pub use models::SearchEnvelope;
pub use service::PageSearcher;

use serde::Deserialize;

/// Default number of pages returned when the caller omits `match_count`
pub const DEFAULT_MATCH_COUNT: u32 = 5;

/// Default minimum similarity when the caller omits `threshold`
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Documented upper bound for `match_count`. Advertised in the tool schema,
/// not enforced: the value is forwarded to the backend as given.
pub const MAX_MATCH_COUNT: u32 = 50;

/// Parameter defaults applied when a tool call omits them
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    pub match_count: u32,
    pub threshold: f64,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            match_count: DEFAULT_MATCH_COUNT,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Failure of one of the two upstream calls.
///
/// Both variants end up as the `error` field of a [`SearchEnvelope`]; they
/// never surface as protocol faults.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Failed to get embedding: {0:#}")]
    Embedding(#[source] anyhow::Error),

    #[error("Failed to search pages: {0:#}")]
    Search(#[source] anyhow::Error),
}
