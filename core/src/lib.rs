//! # azd-mcp Core
//!
//! Contract types shared by every azd-mcp crate.
//!
//! Agent-facing tools are plain `(Tool, ToolExecutorFn)` pairs:
//!
//! - **Tool**: name, description and JSON input schema advertised to callers
//! - **`ToolExecutorFn`**: shared async function taking the JSON input string
//! - **`ToolError`**: failure to run the tool at all (bad input, unknown tool)
//!
//! A tool that ran but found a problem in the caller's data (for example an
//! invalid `azure.yaml`) reports it in its output text, not as a `ToolError`.

pub mod tool;

// Re-export commonly used types
pub use tool::{Tool, ToolError, ToolExecutorFn, ToolFuture, ToolResult};
