//! MCP (Model Context Protocol) server implementation
//!
//! Exposes `search_roam_pages` as a tool for Claude Desktop, Claude Code
//! and other MCP clients.

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;

pub use protocol::*;
pub use server::McpServer;
