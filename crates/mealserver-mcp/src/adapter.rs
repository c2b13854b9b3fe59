//! Adapter between the core tool/resource/prompt registries and MCP types

use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use mealserver_core::{CatalogResources, PromptLibrary, ToolExecutor, ToolRegistry};

use crate::protocol::{
    GetPromptResult, McpPrompt, McpPromptArgument, McpResource, McpTool, PromptMessage,
    ReadResourceResult, ResourceContents, TextContent, ToolCallResult,
};

/// Adapts mealserver's registries to MCP result shapes
pub struct McpAdapter {
    tools: Arc<ToolRegistry>,
    resources: Arc<CatalogResources>,
    prompts: PromptLibrary,
}

impl McpAdapter {
    pub fn new(tools: Arc<ToolRegistry>, resources: Arc<CatalogResources>) -> Self {
        Self {
            tools,
            resources,
            prompts: PromptLibrary::new(),
        }
    }

    /// List all tools as MCP tool definitions
    pub fn list_tools(&self) -> Vec<McpTool> {
        self.tools
            .list_tools()
            .into_iter()
            .map(|t| McpTool {
                name: t.name,
                description: t.description,
                input_schema: t.input_schema,
            })
            .collect()
    }

    /// Execute a tool and return MCP-formatted result
    pub async fn call_tool(&self, name: &str, arguments: Value) -> ToolCallResult {
        debug!("MCP calling tool: {}", name);
        match self.tools.execute(name, arguments).await {
            Ok(result) => ToolCallResult {
                content: vec![TextContent::text(result)],
                is_error: None,
            },
            Err(e) => ToolCallResult {
                content: vec![TextContent::text(format!("Error: {}", e))],
                is_error: Some(true),
            },
        }
    }

    pub fn list_resources(&self) -> Vec<McpResource> {
        self.resources
            .list()
            .into_iter()
            .map(|r| McpResource {
                uri: r.uri,
                name: r.name,
                description: r.description,
                mime_type: r.mime_type,
            })
            .collect()
    }

    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult> {
        let text = self.resources.read(uri).await?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents {
                uri: uri.to_string(),
                mime_type: "application/json".to_string(),
                text,
            }],
        })
    }

    pub fn list_prompts(&self) -> Vec<McpPrompt> {
        self.prompts
            .list()
            .iter()
            .map(|p| McpPrompt {
                name: p.name.to_string(),
                description: p.description.to_string(),
                arguments: p
                    .arguments
                    .iter()
                    .map(|a| McpPromptArgument {
                        name: a.name.to_string(),
                        description: a.description.to_string(),
                        required: a.required,
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn get_prompt(
        &self,
        name: &str,
        arguments: &std::collections::HashMap<String, String>,
    ) -> Result<GetPromptResult> {
        let rendered = self.prompts.render(name, arguments)?;
        Ok(GetPromptResult {
            description: rendered.description,
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content: TextContent::text(rendered.text),
            }],
        })
    }
}
