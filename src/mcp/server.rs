//! MCP Server implementation
//!
//! Implements the MCP server that communicates over stdio using JSON-RPC 2.0.

use super::handlers::ToolHandler;
use super::protocol::*;
use super::tools::all_tools;
use crate::search::PageSearcher;
use anyhow::Result;
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "Supabase Page Search MCP";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server that handles JSON-RPC 2.0 requests over stdio
pub struct McpServer {
    tool_handler: ToolHandler,
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server around the given searcher
    pub fn new(searcher: Arc<PageSearcher>) -> Self {
        Self {
            tool_handler: ToolHandler::new(searcher),
            initialized: false,
        }
    }

    /// Run the server, reading from stdin and writing to stdout
    pub async fn run(&mut self) -> Result<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let reader = BufReader::new(stdin.lock());
        let writer = stdout.lock();

        info!("MCP server starting on stdio");
        self.serve(reader, writer).await?;
        info!("MCP server shutting down");
        Ok(())
    }

    /// Process newline-delimited JSON-RPC messages from `reader` until EOF,
    /// writing one response line per request to `writer`.
    pub async fn serve<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> Result<()> {
        for line in reader.lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    error!("Failed to read line: {}", e);
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            debug!("Received: {}", line);

            if let Some(resp) = self.handle_message(&line).await {
                let json = serde_json::to_string(&resp)?;
                debug!("Sending: {}", json);
                writeln!(writer, "{}", json)?;
                writer.flush()?;
            }
        }
        Ok(())
    }

    /// Handle a single JSON-RPC message
    async fn handle_message(&mut self, message: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(message) {
            Ok(r) => r,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(e.to_string()),
                ));
            }
        };

        // Notifications have no ID and get no response
        let id = match &request.id {
            Some(id) => id.clone(),
            None => {
                self.handle_notification(&request);
                return None;
            }
        };

        let result = self.handle_request(&request).await;

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    /// Handle a notification (no response expected)
    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" => {
                info!("Client confirmed initialization");
            }
            "notifications/cancelled" => {
                warn!("Request cancelled by client");
            }
            _ => {
                debug!("Unknown notification: {}", request.method);
            }
        }
    }

    /// Handle a request and return the result or error
    async fn handle_request(&mut self, request: &JsonRpcRequest) -> Result<Value, JsonRpcError> {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(&request.params),
            "ping" => Ok(json!({})),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(&request.params).await,
            _ => Err(JsonRpcError::method_not_found(&request.method)),
        }
    }

    /// Handle initialize request
    fn handle_initialize(&mut self, params: &Option<Value>) -> Result<Value, JsonRpcError> {
        let params: Option<InitializeParams> = params
            .as_ref()
            .map(|p| serde_json::from_value(p.clone()))
            .transpose()
            .map_err(|e| JsonRpcError::invalid_params(e.to_string()))?;

        if let Some(ref params) = params {
            info!(
                "Initializing MCP server (client protocol: {})",
                params.protocol_version
            );
            if let Some(ref client) = params.client_info {
                info!(
                    "Client: {} v{}",
                    client.name,
                    client.version.as_deref().unwrap_or("unknown")
                );
            }
        }

        self.initialized = true;

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
    }

    /// Handle tools/list request
    fn handle_tools_list(&self) -> Result<Value, JsonRpcError> {
        if !self.initialized {
            return Err(JsonRpcError::invalid_request("Server not initialized"));
        }

        let result = ToolsListResult {
            tools: all_tools(&self.tool_handler.defaults()),
        };

        serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
    }

    /// Handle tools/call request
    async fn handle_tools_call(&self, params: &Option<Value>) -> Result<Value, JsonRpcError> {
        if !self.initialized {
            return Err(JsonRpcError::invalid_request("Server not initialized"));
        }

        let params: ToolCallParams = params
            .as_ref()
            .ok_or_else(|| JsonRpcError::invalid_params("params required"))
            .and_then(|p| {
                serde_json::from_value(p.clone())
                    .map_err(|e| JsonRpcError::invalid_params(e.to_string()))
            })?;

        info!("Tool call: {}", params.name);
        debug!("Arguments: {:?}", params.arguments);

        let tool_result = match self
            .tool_handler
            .handle(&params.name, params.arguments)
            .await
        {
            Ok(text) => ToolCallResult::success(text),
            Err(e) => {
                error!("Tool error: {}", e);
                ToolCallResult::error(e.to_string())
            }
        };

        serde_json::to_value(tool_result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::MockEmbeddingProvider;
    use crate::search::SearchDefaults;
    use crate::supabase::{MockSimilaritySearch, NoteMatch};

    fn server_with(
        embeddings: MockEmbeddingProvider,
        store: Arc<MockSimilaritySearch>,
    ) -> McpServer {
        let searcher = PageSearcher::new(Arc::new(embeddings), store, SearchDefaults::default());
        McpServer::new(Arc::new(searcher))
    }

    fn mock_server() -> McpServer {
        server_with(
            MockEmbeddingProvider::new(16),
            Arc::new(MockSimilaritySearch::with_matches(vec![
                NoteMatch::new("a1", "Productivity tips", 0.9),
                NoteMatch::new("a2", "Pomodoro", 0.75),
            ])),
        )
    }

    async fn call(server: &mut McpServer, message: Value) -> Value {
        let resp = server
            .handle_message(&message.to_string())
            .await
            .expect("request should get a response");
        serde_json::to_value(resp).unwrap()
    }

    async fn initialize(server: &mut McpServer) {
        call(
            server,
            json!({"jsonrpc":"2.0","id":0,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"claude-code","version":"1.0"}}}),
        )
        .await;
    }

    fn tool_text(resp: &Value) -> Value {
        let text = resp["result"]["content"][0]["text"].as_str().unwrap();
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_result() {
        let mut server = mock_server();
        let resp = call(
            &mut server,
            json!({"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{}}}),
        )
        .await;
        assert_eq!(resp["id"], 1);
        assert_eq!(resp["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(resp["result"]["serverInfo"]["name"], "Supabase Page Search MCP");
        assert_eq!(resp["result"]["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn test_tools_list_requires_initialize() {
        let mut server = mock_server();
        let resp = call(&mut server, json!({"jsonrpc":"2.0","id":2,"method":"tools/list"})).await;
        assert_eq!(resp["error"]["code"], JsonRpcError::INVALID_REQUEST);

        initialize(&mut server).await;
        let resp = call(&mut server, json!({"jsonrpc":"2.0","id":3,"method":"tools/list"})).await;
        let tools = resp["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "search_roam_pages");
        assert_eq!(tools[0]["inputSchema"]["required"], json!(["query"]));
    }

    #[tokio::test]
    async fn test_tools_call_returns_envelope_text() {
        let mut server = mock_server();
        initialize(&mut server).await;

        let resp = call(
            &mut server,
            json!({"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"search_roam_pages","arguments":{"query":"productivity tips"}}}),
        )
        .await;

        assert_eq!(resp["result"]["isError"], false);
        let envelope = tool_text(&resp);
        assert_eq!(envelope["query"], "productivity tips");
        assert_eq!(envelope["total_matches"], 2);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_not_a_tool_error() {
        let mut server = server_with(
            MockEmbeddingProvider::failing("rate limited"),
            Arc::new(MockSimilaritySearch::empty()),
        );
        initialize(&mut server).await;

        let resp = call(
            &mut server,
            json!({"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"search_roam_pages","arguments":{"query":"q"}}}),
        )
        .await;

        assert!(resp.get("error").is_none());
        assert_eq!(resp["result"]["isError"], false);
        let envelope = tool_text(&resp);
        assert_eq!(envelope["error"], "Failed to get embedding: rate limited");
        assert_eq!(envelope["query"], "q");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_tool_error() {
        let mut server = mock_server();
        initialize(&mut server).await;

        let resp = call(
            &mut server,
            json!({"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"nope","arguments":{}}}),
        )
        .await;
        assert_eq!(resp["result"]["isError"], true);
        assert_eq!(resp["result"]["content"][0]["text"], "Unknown tool: nope");
    }

    #[tokio::test]
    async fn test_tools_call_without_params() {
        let mut server = mock_server();
        initialize(&mut server).await;

        let resp = call(&mut server, json!({"jsonrpc":"2.0","id":7,"method":"tools/call"})).await;
        assert_eq!(resp["error"]["code"], JsonRpcError::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_parse_error_and_unknown_method() {
        let mut server = mock_server();

        let resp = server.handle_message("{not json").await.unwrap();
        let resp = serde_json::to_value(resp).unwrap();
        assert_eq!(resp["id"], Value::Null);
        assert_eq!(resp["error"]["code"], JsonRpcError::PARSE_ERROR);

        let resp = call(&mut server, json!({"jsonrpc":"2.0","id":8,"method":"resources/list"})).await;
        assert_eq!(resp["error"]["code"], JsonRpcError::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let mut server = mock_server();
        let resp = server
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(resp.is_none());
    }

    #[tokio::test]
    async fn test_serve_over_buffers() {
        let mut server = mock_server();
        let input = [
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{}}}"#,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "",
            r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
        ]
        .join("\n");

        let mut output = Vec::new();
        server
            .serve(std::io::Cursor::new(input), &mut output)
            .await
            .unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1], json!({"jsonrpc":"2.0","id":2,"result":{}}));
    }
}
