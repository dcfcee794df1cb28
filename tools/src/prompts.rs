//! Static prompt documents exposed as tools
//!
//! Most of the agent catalog returns fixed instructional Markdown. The
//! documents are embedded at compile time and looked up by tool name from an
//! immutable table.

use crate::registry::ToolRegistry;
use azd_mcp_core::{Tool, ToolExecutorFn, ToolFuture};
use serde_json::json;
use std::sync::Arc;

/// One embedded document and the tool it is served by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptDocument {
    /// Tool name
    pub name: &'static str,
    /// Tool description shown to agents
    pub description: &'static str,
    /// Markdown body returned verbatim
    pub body: &'static str,
}

static CATALOG: &[PromptDocument] = &[
    PromptDocument {
        name: "azd_plan_init",
        description: "Returns the step-by-step plan for preparing an application for azd deployment",
        body: include_str!("../docs/plan_init.md"),
    },
    PromptDocument {
        name: "azd_discovery_analysis",
        description: "Returns instructions for inventorying the components of an application",
        body: include_str!("../docs/discovery_analysis.md"),
    },
    PromptDocument {
        name: "azd_architecture_planning",
        description: "Returns guidance for choosing Azure hosting and supporting services",
        body: include_str!("../docs/architecture_planning.md"),
    },
    PromptDocument {
        name: "azd_azure_yaml_generation",
        description: "Returns rules and an example for writing azure.yaml",
        body: include_str!("../docs/azure_yaml_generation.md"),
    },
    PromptDocument {
        name: "azd_docker_generation",
        description: "Returns rules for writing Dockerfiles for containerized services",
        body: include_str!("../docs/docker_generation.md"),
    },
    PromptDocument {
        name: "azd_infrastructure_generation",
        description: "Returns the layout expected for Bicep infrastructure under infra/",
        body: include_str!("../docs/infrastructure_generation.md"),
    },
    PromptDocument {
        name: "azd_iac_generation_rules",
        description: "Returns naming, security and structure rules for generated Bicep",
        body: include_str!("../docs/iac_generation_rules.md"),
    },
    PromptDocument {
        name: "azd_project_validation",
        description: "Returns the checklist for validating a project before deployment",
        body: include_str!("../docs/project_validation.md"),
    },
    PromptDocument {
        name: "azd_yaml_schema",
        description: "Returns an overview of the azure.yaml schema versions and properties",
        body: include_str!("../docs/yaml_schema.md"),
    },
    PromptDocument {
        name: "azd_error_troubleshooting",
        description: "Returns a procedure for diagnosing azd package, provision and deploy errors",
        body: include_str!("../docs/error_troubleshooting.md"),
    },
];

/// Every embedded document, in catalog order
#[must_use]
pub fn all() -> &'static [PromptDocument] {
    CATALOG
}

/// Look up a document by tool name
#[must_use]
pub fn find(name: &str) -> Option<&'static PromptDocument> {
    CATALOG.iter().find(|doc| doc.name == name)
}

/// Create the tool serving `doc`
///
/// Takes no input; returns the Markdown body.
#[must_use]
pub fn prompt_tool(doc: &'static PromptDocument) -> (Tool, ToolExecutorFn) {
    let tool = Tool::new(
        doc.name,
        doc.description,
        json!({
            "type": "object",
            "properties": {}
        }),
    );

    let body = doc.body;
    let executor = Arc::new(move |_input: String| {
        Box::pin(async move { Ok(body.to_string()) }) as ToolFuture
    }) as ToolExecutorFn;

    (tool, executor)
}

/// Register every prompt tool; returns how many were added
pub fn register_prompt_tools(registry: &ToolRegistry) -> usize {
    for doc in CATALOG {
        let (tool, executor) = prompt_tool(doc);
        registry.register(tool, executor);
    }
    CATALOG.len()
}
