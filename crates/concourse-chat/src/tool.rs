//! Tool trait and catalog

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use concourse_ai::ToolSpec;

use crate::error::{Error, Result};

/// Result of a tool execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    /// Text to feed back to the model
    pub content: String,
    /// Whether the handler reported a failure
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            is_error: true,
        }
    }
}

/// Trait for executable tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (used in API calls)
    fn name(&self) -> &str;

    /// Tool description for the model
    fn description(&self) -> &str;

    /// JSON Schema for parameters
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with validated arguments
    async fn execute(&self, arguments: serde_json::Value) -> ToolResult;
}

/// Type alias for a shared tool
pub type BoxedTool = Arc<dyn Tool>;

/// Name-indexed tool registry with compiled argument validators.
///
/// Dispatch goes through the catalog only; adding a tool never touches the
/// turn loop.
#[derive(Default)]
pub struct ToolCatalog {
    tools: Vec<BoxedTool>,
    validators: HashMap<String, Arc<jsonschema::Validator>>,
}

impl ToolCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, compiling its parameter schema
    pub fn add(&mut self, tool: BoxedTool) {
        let schema = tool.parameters_schema();
        match jsonschema::validator_for(&schema) {
            Ok(validator) => {
                self.validators
                    .insert(tool.name().to_string(), Arc::new(validator));
            }
            Err(e) => {
                tracing::warn!(
                    "Invalid tool parameter schema for '{}', skipping validation: {}",
                    tool.name(),
                    e
                );
            }
        }
        self.tools.push(tool);
    }

    /// Whether the catalog declares no tools
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&BoxedTool> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Registered tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Declarations to send with a completion request
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools
            .iter()
            .map(|t| ToolSpec::new(t.name(), t.description(), t.parameters_schema()))
            .collect()
    }

    /// Parse a raw argument payload and validate it against the tool's schema
    pub fn parse_arguments(&self, name: &str, raw: &str) -> Result<serde_json::Value> {
        let args: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| Error::malformed_args(name, format!("invalid JSON: {}", e)))?;

        if let Some(validator) = self.validators.get(name) {
            if let Some(message) = validation_errors(&args, validator) {
                return Err(Error::malformed_args(name, message));
            }
        }

        Ok(args)
    }
}

/// Collect schema validation failures into one message.
/// Returns `None` when the arguments are valid.
fn validation_errors(
    args: &serde_json::Value,
    validator: &jsonschema::Validator,
) -> Option<String> {
    let errors: Vec<String> = validator
        .iter_errors(args)
        .map(|e| {
            let path = e.instance_path.to_string();
            if path.is_empty() {
                e.to_string()
            } else {
                format!("{}: {}", path, e)
            }
        })
        .collect();

    if errors.is_empty() {
        None
    } else {
        Some(errors.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes input"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" }
                },
                "required": ["text"],
                "additionalProperties": false
            })
        }
        async fn execute(&self, arguments: serde_json::Value) -> ToolResult {
            let text = arguments
                .get("text")
                .and_then(|v| v.as_str())
                .unwrap_or("(empty)");
            ToolResult::text(text)
        }
    }

    fn catalog() -> ToolCatalog {
        let mut c = ToolCatalog::new();
        c.add(Arc::new(EchoTool));
        c
    }

    #[test]
    fn test_specs_mirror_tools() {
        let c = catalog();
        let specs = c.specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "echo");
        assert_eq!(specs[0].description, "Echoes input");
    }

    #[test]
    fn test_parse_arguments_valid() {
        let c = catalog();
        let args = c.parse_arguments("echo", r#"{"text": "hello"}"#).unwrap();
        assert_eq!(args["text"], "hello");
    }

    #[test]
    fn test_parse_arguments_invalid_json() {
        let c = catalog();
        let err = c.parse_arguments("echo", "{not json").unwrap_err();
        match err {
            Error::MalformedToolArguments { tool, message } => {
                assert_eq!(tool, "echo");
                assert!(message.contains("invalid JSON"));
            }
            other => panic!("expected MalformedToolArguments, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_arguments_schema_mismatch() {
        let c = catalog();
        // Missing required "text"
        assert!(matches!(
            c.parse_arguments("echo", "{}"),
            Err(Error::MalformedToolArguments { .. })
        ));
        // Wrong type
        assert!(matches!(
            c.parse_arguments("echo", r#"{"text": 42}"#),
            Err(Error::MalformedToolArguments { .. })
        ));
        // Extra key rejected by additionalProperties
        assert!(matches!(
            c.parse_arguments("echo", r#"{"text": "hi", "volume": 11}"#),
            Err(Error::MalformedToolArguments { .. })
        ));
    }

    #[test]
    fn test_lookup() {
        let c = catalog();
        assert!(c.get("echo").is_some());
        assert!(c.get("missing").is_none());
        assert_eq!(c.names(), vec!["echo"]);
        assert!(!c.is_empty());
        assert!(ToolCatalog::new().is_empty());
    }

    #[tokio::test]
    async fn test_execute() {
        let c = catalog();
        let tool = c.get("echo").unwrap();
        let result = tool.execute(serde_json::json!({"text": "hello"})).await;
        assert!(!result.is_error);
        assert_eq!(result.content, "hello");
    }
}
