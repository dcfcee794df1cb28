//! Agent-facing tools for preparing azd projects
//!
//! Most tools return fixed instructional Markdown. The one with real logic
//! is `validate_azure_yaml`, which checks an `azure.yaml` document against the
//! published JSON schemas.
//!
//! ## Modules
//!
//! - `schema`: configuration schema validation (normalizer, loaders,
//!   candidates, orchestrator)
//! - `yaml_schema`: the `validate_azure_yaml` tool wrapping the validator
//! - `prompts`: embedded prompt documents served as tools
//! - `registry`: tool registry for lookup and execution by name

pub mod prompts;
pub mod registry;
pub mod schema;
pub mod yaml_schema;

pub use azd_mcp_core::{Tool, ToolError, ToolExecutorFn, ToolResult};

// Re-export commonly used types
pub use registry::ToolRegistry;
pub use schema::{SchemaValidator, ValidationOutcome, ValidatorConfig};

use std::sync::Arc;

/// Build a registry holding the full tool catalog
#[must_use]
pub fn catalog(validator: Arc<SchemaValidator>) -> ToolRegistry {
    let registry = ToolRegistry::new();
    prompts::register_prompt_tools(&registry);

    let (tool, executor) = yaml_schema::validate_azure_yaml_tool(validator);
    registry.register(tool, executor);

    registry
}
