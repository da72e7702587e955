//! Roam Page Search
//!
//! An MCP server with a single tool, `search_roam_pages`:
//! - OpenAI embeddings turn the query into a vector
//! - A Supabase stored procedure ranks stored Roam pages by similarity
//! - The result comes back to the agent as a JSON envelope

pub mod embeddings;
pub mod mcp;
pub mod search;
pub mod supabase;

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use embeddings::provider::{DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_URL};
use search::SearchDefaults;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub openai: OpenAiYamlConfig,
    pub supabase: SupabaseYamlConfig,
    pub search: SearchDefaults,
}

/// OpenAI (embedding provider) configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenAiYamlConfig {
    pub api_key: String,
    pub embedding_url: String,
    pub model: String,
}

impl Default for OpenAiYamlConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            embedding_url: DEFAULT_EMBEDDING_URL.into(),
            model: DEFAULT_EMBEDDING_MODEL.into(),
        }
    }
}

/// Supabase configuration section
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SupabaseYamlConfig {
    pub url: String,
    pub key: String,
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub embedding_url: String,
    pub embedding_model: String,
    pub supabase_url: String,
    pub supabase_key: String,
    pub search: SearchDefaults,
}

impl Config {
    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        Ok(Self {
            openai_api_key: std::env::var("OPENAI_API_KEY").unwrap_or(yaml.openai.api_key),
            embedding_url: std::env::var("EMBEDDING_URL").unwrap_or(yaml.openai.embedding_url),
            embedding_model: std::env::var("EMBEDDING_MODEL").unwrap_or(yaml.openai.model),
            supabase_url: std::env::var("SUPABASE_URL").unwrap_or(yaml.supabase.url),
            supabase_key: std::env::var("SUPABASE_KEY").unwrap_or(yaml.supabase.key),
            search: SearchDefaults {
                match_count: std::env::var("SEARCH_MATCH_COUNT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(yaml.search.match_count),
                threshold: std::env::var("SEARCH_THRESHOLD")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(yaml.search.threshold),
            },
        })
    }

    /// Check that every secret needed to reach the two upstream services is
    /// set and that the search defaults are usable.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("OPENAI_API_KEY", &self.openai_api_key),
            ("SUPABASE_URL", &self.supabase_url),
            ("SUPABASE_KEY", &self.supabase_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            anyhow::bail!("Missing required configuration: {}", missing.join(", "));
        }
        if self.search.match_count == 0 {
            anyhow::bail!("Invalid search.match_count: must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.search.threshold) {
            anyhow::bail!(
                "Invalid search.threshold {}: must be between 0.0 and 1.0",
                self.search.threshold
            );
        }
        Ok(())
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
