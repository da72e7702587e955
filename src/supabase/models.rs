//! Wire types for the `match_notes_by_embedding` RPC

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the stored procedure performing the similarity ranking
pub const MATCH_NOTES_RPC: &str = "match_notes_by_embedding";

/// Request body posted to `/rest/v1/rpc/match_notes_by_embedding`
#[derive(Debug, Serialize)]
pub struct MatchNotesRequest<'a> {
    pub match_count: u32,
    pub query_embedding: &'a [f32],
    pub threshold: f64,
}

/// A single row returned by the stored procedure.
///
/// Rows are kept exactly as the backend sent them (same keys, same order,
/// nulls included). The usual columns are `uid`, `text` and `similarity`,
/// but nothing here requires them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteMatch(pub Map<String, Value>);

impl NoteMatch {
    pub fn new(uid: impl Into<String>, text: impl Into<String>, similarity: f64) -> Self {
        let mut row = Map::new();
        row.insert("uid".into(), Value::String(uid.into()));
        row.insert("text".into(), Value::String(text.into()));
        row.insert("similarity".into(), Value::from(similarity));
        Self(row)
    }

    /// Roam block/page uid, when present and a string
    pub fn uid(&self) -> Option<&str> {
        self.0.get("uid").and_then(Value::as_str)
    }

    /// Page title, when present and a string
    pub fn text(&self) -> Option<&str> {
        self.0.get("text").and_then(Value::as_str)
    }

    /// Backend similarity score, when present and numeric
    pub fn similarity(&self) -> Option<f64> {
        self.0.get("similarity").and_then(Value::as_f64)
    }
}
