//! MCP Tool handlers
//!
//! Maps tool-call arguments onto [`PageSearcher`].

use super::tools::SEARCH_ROAM_PAGES;
use crate::search::{PageSearcher, SearchDefaults};
use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};
use std::sync::Arc;

/// Handles MCP tool calls
pub struct ToolHandler {
    searcher: Arc<PageSearcher>,
}

impl ToolHandler {
    pub fn new(searcher: Arc<PageSearcher>) -> Self {
        Self { searcher }
    }

    pub fn defaults(&self) -> SearchDefaults {
        self.searcher.defaults()
    }

    /// Handle a tool call and return the text content of the result.
    ///
    /// `Err` means the call itself was unusable (unknown tool, bad
    /// arguments). Upstream failures are reported inside the JSON text.
    pub async fn handle(&self, name: &str, args: Option<Value>) -> Result<String> {
        let args = args.unwrap_or(json!({}));

        match name {
            SEARCH_ROAM_PAGES => self.search_roam_pages(args).await,
            _ => Err(anyhow!("Unknown tool: {}", name)),
        }
    }

    async fn search_roam_pages(&self, args: Value) -> Result<String> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .context("query is required")?;

        let match_count = present(&args, "match_count")
            .map(|v| positive_count(v).context("match_count must be a positive integer"))
            .transpose()?;

        let threshold = present(&args, "threshold")
            .map(|v| v.as_f64().context("threshold must be a number"))
            .transpose()?;

        Ok(self
            .searcher
            .search_roam_pages(query, match_count, threshold)
            .await)
    }
}

/// Argument value, treating an explicit `null` like an omitted key
fn present<'a>(args: &'a Value, key: &str) -> Option<&'a Value> {
    args.get(key).filter(|v| !v.is_null())
}

/// Positive integer that fits a `u32`; integral floats such as `5.0` count.
fn positive_count(v: &Value) -> Option<u32> {
    v.as_u64()
        .or_else(|| {
            v.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 1.0 && *f <= f64::from(u32::MAX))
                .map(|f| f as u64)
        })
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
}
