//! MCP server implementation over STDIO
//!
//! Reads JSON-RPC requests line by line, dispatches to the adapter, writes
//! newline-delimited responses. The same dispatcher backs the HTTP transport.

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::adapter::McpAdapter;
use crate::protocol::*;

/// MCP server dispatching to a meal adapter
pub struct McpServer {
    adapter: McpAdapter,
    name: String,
}

impl McpServer {
    pub fn new(adapter: McpAdapter) -> Self {
        Self {
            adapter,
            name: "mealserver".to_string(),
        }
    }

    /// Run the MCP server over STDIO (stdin/stdout)
    pub async fn serve_stdio(&self) -> Result<()> {
        info!("MCP server starting on STDIO");
        let reader = BufReader::new(io::stdin());
        let mut stdout = io::stdout();
        self.serve(reader, &mut stdout).await?;
        info!("MCP server STDIO closed");
        Ok(())
    }

    /// Serve newline-delimited JSON-RPC from `reader` until EOF
    pub async fn serve<R, W>(&self, reader: R, writer: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            debug!("MCP received: {}", truncate(line, 200));

            let response = match serde_json::from_str::<JsonRpcRequest>(line) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => {
                    warn!("Invalid JSON-RPC request: {}", e);
                    Some(JsonRpcResponse::error(
                        Value::Null,
                        PARSE_ERROR,
                        format!("Parse error: {}", e),
                    ))
                }
            };

            if let Some(resp) = response {
                write_response(writer, &resp).await?;
            }
        }

        Ok(())
    }

    /// Handle a single JSON-RPC request. Notifications (no id) yield `None`.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            if request.method == "notifications/initialized" {
                info!("MCP client initialized");
            } else {
                debug!("MCP notification: {}", request.method);
            }
            return None;
        };

        match request.method.as_str() {
            "initialize" => {
                let result = InitializeResult {
                    protocol_version: PROTOCOL_VERSION.to_string(),
                    capabilities: ServerCapabilities {
                        tools: ListChangedCapability {
                            list_changed: false,
                        },
                        resources: ResourcesCapability {
                            subscribe: false,
                            list_changed: false,
                        },
                        prompts: ListChangedCapability {
                            list_changed: false,
                        },
                    },
                    server_info: ServerInfo {
                        name: self.name.clone(),
                        version: env!("CARGO_PKG_VERSION").to_string(),
                    },
                };
                Some(JsonRpcResponse::from_result(id, &result))
            }

            "ping" => Some(JsonRpcResponse::success(id, serde_json::json!({}))),

            "tools/list" => {
                let tools = self.adapter.list_tools();
                info!("MCP tools/list: returning {} tools", tools.len());
                Some(JsonRpcResponse::success(
                    id,
                    serde_json::json!({ "tools": tools }),
                ))
            }

            "tools/call" => {
                let name = request
                    .params
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                let arguments = request
                    .params
                    .get("arguments")
                    .cloned()
                    .unwrap_or(serde_json::json!({}));

                if name.is_empty() {
                    return Some(JsonRpcResponse::error(
                        id,
                        INVALID_PARAMS,
                        "Missing 'name' parameter".to_string(),
                    ));
                }

                info!("MCP tools/call: {}", name);
                let result = self.adapter.call_tool(name, arguments).await;
                Some(JsonRpcResponse::from_result(id, &result))
            }

            "resources/list" => {
                let resources = self.adapter.list_resources();
                Some(JsonRpcResponse::success(
                    id,
                    serde_json::json!({ "resources": resources }),
                ))
            }

            "resources/read" => {
                let params: ReadResourceParams = match serde_json::from_value(request.params) {
                    Ok(p) => p,
                    Err(e) => {
                        return Some(JsonRpcResponse::error(
                            id,
                            INVALID_PARAMS,
                            format!("Invalid params: {}", e),
                        ));
                    }
                };

                info!("MCP resources/read: {}", params.uri);
                match self.adapter.read_resource(&params.uri).await {
                    Ok(result) => Some(JsonRpcResponse::from_result(id, &result)),
                    Err(e) => Some(JsonRpcResponse::error(
                        id,
                        RESOURCE_NOT_FOUND,
                        e.to_string(),
                    )),
                }
            }

            "prompts/list" => {
                let prompts = self.adapter.list_prompts();
                Some(JsonRpcResponse::success(
                    id,
                    serde_json::json!({ "prompts": prompts }),
                ))
            }

            "prompts/get" => {
                let params: GetPromptParams = match serde_json::from_value(request.params) {
                    Ok(p) => p,
                    Err(e) => {
                        return Some(JsonRpcResponse::error(
                            id,
                            INVALID_PARAMS,
                            format!("Invalid params: {}", e),
                        ));
                    }
                };

                info!("MCP prompts/get: {}", params.name);
                match self.adapter.get_prompt(&params.name, &params.arguments) {
                    Ok(result) => Some(JsonRpcResponse::from_result(id, &result)),
                    Err(e) => Some(JsonRpcResponse::error(id, INVALID_PARAMS, e.to_string())),
                }
            }

            _ => {
                warn!("MCP unknown method: {}", request.method);
                Some(JsonRpcResponse::error(
                    id,
                    METHOD_NOT_FOUND,
                    format!("Unknown method: {}", request.method),
                ))
            }
        }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Write a JSON-RPC response (newline-delimited)
async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &JsonRpcResponse,
) -> Result<()> {
    let json = serde_json::to_string(response).context("Failed to serialize response")?;
    debug!("MCP sending: {}", truncate(&json, 200));
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
