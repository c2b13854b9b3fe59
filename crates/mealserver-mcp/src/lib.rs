//! MCP (Model Context Protocol) support for mealserver
//!
//! Exposes the meal tools, catalog resources and prompt templates to MCP
//! clients over STDIO or HTTP.

pub mod adapter;
pub mod http;
pub mod protocol;
pub mod server;

pub use adapter::McpAdapter;
pub use server::McpServer;
