//! Tool registry
//!
//! The registry provides:
//! - Tool registration at start-up
//! - Thread-safe lookup and execution by name
//! - Sorted listing for advertising the catalog to a host protocol

use azd_mcp_core::{Tool, ToolError, ToolExecutorFn, ToolResult};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, instrument};

type ToolTable = HashMap<String, (Tool, ToolExecutorFn)>;

/// Thread-safe name → tool table
///
/// ## Example
///
/// ```ignore
/// use azd_mcp_tools::registry::ToolRegistry;
/// use azd_mcp_tools::yaml_schema::validate_azure_yaml_tool;
///
/// let registry = ToolRegistry::new();
/// let (tool, executor) = validate_azure_yaml_tool(validator);
/// registry.register(tool, executor);
///
/// let result = registry.execute("validate_azure_yaml", r#"{"path": "azure.yaml"}"#.to_string()).await;
/// ```
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Arc<RwLock<ToolTable>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    // The table holds no invariant a panicking writer could break halfway,
    // so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, ToolTable> {
        self.tools.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ToolTable> {
        self.tools.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a tool with its executor
    ///
    /// Returns `true` if a tool with the same name was replaced.
    pub fn register(&self, tool: Tool, executor: ToolExecutorFn) -> bool {
        debug!(tool = %tool.name, "registering tool");
        self.write()
            .insert(tool.name.clone(), (tool, executor))
            .is_some()
    }

    /// Execute a tool by name
    ///
    /// # Errors
    ///
    /// Returns `ToolError` if the tool is not found or execution fails
    #[instrument(skip(self, input))]
    pub async fn execute(&self, name: &str, input: String) -> ToolResult {
        // Release the lock before awaiting the executor
        let executor = self.read().get(name).map(|(_, executor)| executor.clone());

        match executor {
            Some(executor) => executor(input).await,
            None => Err(ToolError {
                message: format!("Tool not found: {name}"),
            }),
        }
    }

    /// Registered tool names, sorted alphabetically
    #[must_use]
    pub fn list_tools(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered tool definitions, sorted by name
    #[must_use]
    pub fn get_tools(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self.read().values().map(|(tool, _)| tool.clone()).collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Get a specific tool definition by name
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<Tool> {
        self.read().get(name).map(|(tool, _)| tool.clone())
    }

    /// Remove a tool; returns `true` if it was registered
    pub fn unregister(&self, name: &str) -> bool {
        self.write().remove(name).is_some()
    }

    /// Number of registered tools
    #[must_use]
    pub fn count(&self) -> usize {
        self.read().len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
