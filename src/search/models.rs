//! Response envelope returned to the tool caller

use crate::supabase::NoteMatch;
use serde::Serialize;
use serde_json::json;

/// Result of one `search_roam_pages` invocation.
///
/// Serializes to either `{query, results, total_matches}` or
/// `{error, query}`; the two shapes never mix.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SearchEnvelope {
    Found {
        query: String,
        results: Vec<NoteMatch>,
        total_matches: usize,
    },
    Failed {
        error: String,
        query: String,
    },
}

impl SearchEnvelope {
    pub fn found(query: &str, results: Vec<NoteMatch>) -> Self {
        let total_matches = results.len();
        Self::Found {
            query: query.to_string(),
            results,
            total_matches,
        }
    }

    pub fn failed(query: &str, error: impl ToString) -> Self {
        Self::Failed {
            error: error.to_string(),
            query: query.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Pretty-printed JSON (two-space indent, non-ASCII kept literal).
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            fallback_json(&format!("Failed to serialize response: {}", e), self.query())
        })
    }

    pub fn query(&self) -> &str {
        match self {
            Self::Found { query, .. } | Self::Failed { query, .. } => query,
        }
    }
}

/// `{error, query}` built as a `Value`, whose `Display` cannot fail.
fn fallback_json(error: &str, query: &str) -> String {
    format!("{:#}", json!({ "error": error, "query": query }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_found_counts_results() {
        let env = SearchEnvelope::found(
            "productivity",
            vec![
                NoteMatch::new("a", "Getting Things Done", 0.91),
                NoteMatch::new("b", "Deep Work", 0.84),
            ],
        );
        let value: Value = serde_json::from_str(&env.to_json()).unwrap();
        assert_eq!(value["total_matches"], 2);
        assert_eq!(value["results"].as_array().unwrap().len(), 2);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_failed_shape() {
        let env = SearchEnvelope::failed("q", "Failed to get embedding: boom");
        assert!(env.is_error());
        let value: Value = serde_json::from_str(&env.to_json()).unwrap();
        assert_eq!(value["error"], "Failed to get embedding: boom");
        assert_eq!(value["query"], "q");
        assert!(value.get("results").is_none());
        assert!(value.get("total_matches").is_none());
    }

    #[test]
    fn test_pretty_printed_key_order() {
        let env = SearchEnvelope::found("x", vec![]);
        assert_eq!(
            env.to_json(),
            "{\n  \"query\": \"x\",\n  \"results\": [],\n  \"total_matches\": 0\n}"
        );
    }

    #[test]
    fn test_non_ascii_not_escaped() {
        let env = SearchEnvelope::failed("信用卡優惠", "nope");
        let json = env.to_json();
        assert!(json.contains("\"query\": \"信用卡優惠\""));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn test_fallback_json_is_valid_and_unescaped() {
        let json = fallback_json("bad \"row\"\nvalue", "信用卡 \\ 優惠");
        assert!(json.contains("\"query\": \"信用卡 \\\\ 優惠\""));

        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["error"], "bad \"row\"\nvalue");
        assert_eq!(value["query"], "信用卡 \\ 優惠");
        assert!(json.find("\"error\"").unwrap() < json.find("\"query\"").unwrap());
    }
}
