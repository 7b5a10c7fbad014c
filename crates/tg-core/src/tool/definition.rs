//! Tool definition exported to the model
//!
//! エージェントに渡すツール定義（名前・説明・入力スキーマ）

use serde::{Deserialize, Serialize};

/// Tool definition in the shape LLM APIs accept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl ToolDefinition {
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
