//! MCP over HTTP
//!
//! `POST /mcp` takes one JSON-RPC request per body and answers with the
//! JSON-RPC response. Notifications are acknowledged with `202 Accepted`.

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::protocol::{JsonRpcRequest, JsonRpcResponse, PARSE_ERROR};
use crate::server::McpServer;

/// Build the HTTP router for an MCP server
pub fn router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/mcp", post(handle_rpc))
        .route("/health", get(health))
        .with_state(server)
}

/// Bind `addr` and serve until the listener fails
pub async fn serve_http(server: Arc<McpServer>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    serve_listener(server, listener).await
}

/// Serve on an already-bound listener
pub async fn serve_listener(server: Arc<McpServer>, listener: TcpListener) -> Result<()> {
    info!("MCP server listening on http://{}/mcp", listener.local_addr()?);
    axum::serve(listener, router(server))
        .await
        .context("HTTP server error")
}

async fn handle_rpc(State(server): State<Arc<McpServer>>, body: String) -> Response {
    let request = match serde_json::from_str::<JsonRpcRequest>(&body) {
        Ok(r) => r,
        Err(e) => {
            warn!("Invalid JSON-RPC request over HTTP: {}", e);
            let resp = JsonRpcResponse::error(Value::Null, PARSE_ERROR, format!("Parse error: {}", e));
            return Json(resp).into_response();
        }
    };

    match server.handle_request(request).await {
        Some(resp) => Json(resp).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn health() -> &'static str {
    "ok"
}
