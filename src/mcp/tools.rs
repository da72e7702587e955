//! MCP Tool definitions

use super::protocol::{InputSchema, ToolDefinition};
use crate::search::{SearchDefaults, MAX_MATCH_COUNT};
use serde_json::json;

pub const SEARCH_ROAM_PAGES: &str = "search_roam_pages";

/// Generate all tool definitions, advertising the configured defaults
pub fn all_tools(defaults: &SearchDefaults) -> Vec<ToolDefinition> {
    vec![search_roam_pages_tool(defaults)]
}

fn search_roam_pages_tool(defaults: &SearchDefaults) -> ToolDefinition {
    let description = format!(
        "Search for Roam Research pages by semantic similarity using AI embeddings.\n\n\
         Uses OpenAI's text-embedding-3-small model to find pages with similar meaning \
         to your query, even if they don't contain the exact keywords. Useful for \
         discovering related content and finding the right page to write new information.\n\n\
         Returns a JSON string with `query`, `results` (each with `uid`, `text` = page \
         title, `similarity` 0.0-1.0) and `total_matches`, or `error` and `query` if the \
         search failed.\n\n\
         Higher thresholds (0.8+) give more precise matches; lower ones (0.5-0.7) give \
         broader, more exploratory results. Defaults: match_count={}, threshold={}.",
        defaults.match_count, defaults.threshold
    );

    ToolDefinition {
        name: SEARCH_ROAM_PAGES.to_string(),
        description,
        input_schema: InputSchema {
            schema_type: "object".to_string(),
            properties: Some(json!({
                "query": {
                    "type": "string",
                    "description": "Natural language search query, e.g. \"credit card rewards\" or \"meeting notes from last week\""
                },
                "match_count": {
                    "type": "integer",
                    "description": format!("Maximum number of similar pages to return (default: {}, max: {})", defaults.match_count, MAX_MATCH_COUNT),
                    "default": defaults.match_count,
                    "minimum": 1,
                    "maximum": MAX_MATCH_COUNT
                },
                "threshold": {
                    "type": "number",
                    "description": format!("Minimum similarity score for results (default: {}, range: 0.0-1.0)", defaults.threshold),
                    "default": defaults.threshold,
                    "minimum": 0.0,
                    "maximum": 1.0
                }
            })),
            required: Some(vec!["query".to_string()]),
        },
    }
}
