//! Tool contract types
//!
//! A tool is a `(Tool, ToolExecutorFn)` pair: the definition a host
//! protocol advertises to agents, plus the async function that runs it.
//!
//! ## Example
//!
//! ```ignore
//! use azd_mcp_core::tool::{Tool, ToolExecutorFn};
//!
//! let (tool, executor): (Tool, ToolExecutorFn) = validate_azure_yaml_tool(validator);
//! let output = executor(r#"{"path": "azure.yaml"}"#.to_string()).await?;
//! ```

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Tool definition advertised to callers
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    /// Tool name (used to identify which tool to call)
    pub name: String,
    /// Human-readable description of what the tool does
    pub description: String,
    /// JSON schema for the tool's input parameters
    pub input_schema: serde_json::Value,
}

impl Tool {
    /// Create a tool definition
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Result from tool execution
pub type ToolResult = Result<String, ToolError>;

/// Boxed future returned by a tool executor
pub type ToolFuture = Pin<Box<dyn Future<Output = ToolResult> + Send>>;

/// Shared executor function: JSON input string in, tool output out
pub type ToolExecutorFn = Arc<dyn Fn(String) -> ToolFuture + Send + Sync>;

/// Tool execution errors
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolError {
    /// Error message
    pub message: String,
}

impl ToolError {
    /// Create a tool error from any message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ToolError {}
