//! `azure.yaml` validation tool
//!
//! Wraps [`SchemaValidator::validate`] as an agent-callable tool. Problems
//! with the document itself are reported in the tool output, not as a
//! `ToolError`: the tool ran fine, the file did not pass.

use crate::schema::SchemaValidator;
use azd_mcp_core::{Tool, ToolError, ToolExecutorFn, ToolFuture};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

/// Name the validation tool is registered under
pub const VALIDATE_AZURE_YAML: &str = "validate_azure_yaml";

/// Create the `validate_azure_yaml` tool
///
/// Returns either a sentence naming the matching schema tier:
/// ```text
/// The azure.yaml file is valid against the stable schema.
/// ```
/// or a JSON error object:
/// ```json
/// {"error": true, "message": "jsonschema validation failed with '...'\n- at '': missing property 'name'"}
/// ```
#[must_use]
pub fn validate_azure_yaml_tool(validator: Arc<SchemaValidator>) -> (Tool, ToolExecutorFn) {
    let tool = Tool::new(
        VALIDATE_AZURE_YAML,
        "Validate an azure.yaml file against the published azure.yaml JSON schemas \
         (stable first, then alpha) and report which schema it matches or why it \
         matches none",
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the azure.yaml file to validate"
                }
            },
            "required": ["path"]
        }),
    );

    let executor = Arc::new(move |input: String| {
        let validator = Arc::clone(&validator);
        Box::pin(async move {
            let parsed: serde_json::Value = serde_json::from_str(&input).map_err(|e| {
                ToolError {
                    message: format!("Invalid input JSON: {e}"),
                }
            })?;

            let path = parsed["path"]
                .as_str()
                .filter(|path| !path.is_empty())
                .ok_or_else(|| ToolError {
                    message: "Missing 'path' field".to_string(),
                })?;

            let outcome = validator.validate(&PathBuf::from(path)).await;
            Ok(outcome.render())
        }) as ToolFuture
    }) as ToolExecutorFn;

    (tool, executor)
}
