//! Tool trait definition
//!
//! Defines the core trait every agent-callable tool implements.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::Result;

/// Tool execution result
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// Output value from tool execution
    pub output: JsonValue,
    /// Whether the execution resulted in an error
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(output: impl Into<JsonValue>) -> Self {
        Self {
            output: output.into(),
            is_error: false,
        }
    }

    /// Create an error tool result
    pub fn error(output: impl Into<JsonValue>) -> Self {
        Self {
            output: output.into(),
            is_error: true,
        }
    }

    /// Render the output for display (strings are printed bare)
    pub fn output_text(&self) -> String {
        match &self.output {
            JsonValue::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        }
    }
}

/// Tool trait for agent tool calls
///
/// Implement this trait to expose something an agent can invoke with
/// a JSON object of named arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name (used as the tool id in agent tool definitions)
    fn name(&self) -> &str;

    /// Get the tool description (shown to the model when selecting tools)
    fn description(&self) -> &str;

    /// Get the JSON schema for the tool's input parameters
    fn input_schema(&self) -> JsonValue;

    /// Validate and coerce the raw input before execution
    ///
    /// The default accepts the input unchanged.
    fn prepare_input(&self, input: JsonValue) -> Result<JsonValue> {
        Ok(input)
    }

    /// Execute the tool with the given input
    ///
    /// # Arguments
    /// * `input` - JSON value containing the tool input parameters
    ///
    /// # Returns
    /// A `ToolResult` containing the output value
    async fn execute(&self, input: JsonValue) -> Result<ToolResult>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success(json!({"ok": true}));
        assert!(!result.is_error);
        assert_eq!(result.output["ok"], true);
    }

    #[test]
    fn test_tool_result_error() {
        let result = ToolResult::error("boom");
        assert!(result.is_error);
        assert_eq!(result.output_text(), "boom");
    }

    #[test]
    fn test_output_text_pretty_prints_objects() {
        let result = ToolResult::success(json!({"a": 1}));
        assert!(result.output_text().contains("\"a\": 1"));
    }
}
