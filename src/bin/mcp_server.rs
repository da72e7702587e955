//! MCP Server Binary
//!
//! Runs the Roam page search tool as an MCP server, communicating over
//! stdio for integration with Claude Desktop / Claude Code.
//!
//! # Usage
//!
//! ```bash
//! # Run directly (reads .env and config.yaml from CWD if present)
//! ./roam-search-mcp
//!
//! # With an explicit config file and debug logging
//! RUST_LOG=debug ./roam-search-mcp --config ~/.config/roam-search.yaml
//! ```
//!
//! # MCP client integration
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "roam-page-search": {
//!       "command": "/path/to/roam-search-mcp",
//!       "env": {
//!         "OPENAI_API_KEY": "sk-...",
//!         "SUPABASE_URL": "https://your-project.supabase.co",
//!         "SUPABASE_KEY": "your-service-key"
//!       }
//!     }
//!   }
//! }
//! ```

use anyhow::Result;
use clap::Parser;
use roam_page_search::embeddings::EmbeddingProvider;
use roam_page_search::embeddings::HttpEmbeddingProvider;
use roam_page_search::mcp::McpServer;
use roam_page_search::search::PageSearcher;
use roam_page_search::supabase::SupabaseClient;
use roam_page_search::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// MCP Server for semantic Roam page search
#[derive(Parser, Debug)]
#[command(name = "roam-search-mcp")]
#[command(about = "MCP server exposing semantic search over Roam pages stored in Supabase")]
#[command(version)]
struct Args {
    /// YAML config file (defaults to ./config.yaml when present)
    #[arg(long, env = "ROAM_SEARCH_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Initialize logging (to stderr to keep stdout clean for MCP)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("roam_page_search=info".parse()?))
        .init();

    let args = Args::parse();

    let config = Config::from_yaml_and_env(args.config.as_deref())?;
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(e);
    }

    let embeddings = HttpEmbeddingProvider::from_config(&config);
    let store = SupabaseClient::from_config(&config);

    info!("Starting MCP server for Roam page search");
    info!(
        "Embeddings: {} ({})",
        embeddings.model_name(),
        embeddings.url()
    );
    info!("Supabase RPC: {}", store.rpc_url());
    info!(
        "Defaults: match_count={}, threshold={}",
        config.search.match_count, config.search.threshold
    );

    let searcher = PageSearcher::new(Arc::new(embeddings), Arc::new(store), config.search);
    let mut server = McpServer::new(Arc::new(searcher));

    if let Err(e) = server.run().await {
        error!("MCP server error: {}", e);
        return Err(e);
    }

    Ok(())
}
