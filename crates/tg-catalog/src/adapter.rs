//! Catalog Tool Adapter
//!
//! カタログのツールを tg-core の Tool trait に適合させるアダプター

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;

use tg_core::{Result, Tool, ToolResult};

use crate::client::CatalogClient;
use crate::schema::InputSchema;
use crate::types::CatalogTool;

/// User id every authorization and execution is performed under
pub const CALLER_ID: &str = "toolgate";

/// Message returned while a tool still needs authorization
pub const AUTHORIZATION_MESSAGE: &str = "You must authorize the tool to use it.";

/// Resolve the identity used to authorize and execute a tool
///
/// The fully qualified name wins; otherwise `<name>.<toolkit>@<version>`.
pub fn resolve_tool_id(tool: &CatalogTool) -> String {
    match tool.fully_qualified_name.as_deref() {
        Some(fqn) if !fqn.is_empty() => fqn.to_string(),
        _ => format!("{}.{}@{}", tool.name, tool.toolkit.name, tool.toolkit.version),
    }
}

/// Prompt handed back to the agent when authorization is pending
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorizationPrompt {
    pub message: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl AuthorizationPrompt {
    pub fn new(url: Option<String>) -> Self {
        Self {
            message: AUTHORIZATION_MESSAGE.to_string(),
            target: "blank".to_string(),
            url,
        }
    }
}

/// Adapter to make catalog tools compatible with the tg-core Tool trait
pub struct CatalogToolAdapter {
    /// Shared catalog client
    client: Arc<dyn CatalogClient>,
    /// Resolved tool identity
    id: String,
    /// Short tool name as listed in its toolkit
    short_name: String,
    /// Toolkit name
    toolkit: String,
    description: String,
    schema: InputSchema,
}

impl CatalogToolAdapter {
    /// Create a new adapter from a catalog client and tool definition
    pub fn new(client: Arc<dyn CatalogClient>, tool: CatalogTool) -> Self {
        let id = resolve_tool_id(&tool);
        let schema = InputSchema::from_parameters(tool.input.parameters.as_ref());

        Self {
            client,
            id,
            short_name: tool.name,
            toolkit: tool.toolkit.name,
            description: tool.description.unwrap_or_default(),
            schema,
        }
    }

    pub fn tool_id(&self) -> &str {
        &self.id
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn toolkit(&self) -> &str {
        &self.toolkit
    }

    pub fn schema(&self) -> &InputSchema {
        &self.schema
    }
}

impl std::fmt::Debug for CatalogToolAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogToolAdapter")
            .field("id", &self.id)
            .field("short_name", &self.short_name)
            .field("toolkit", &self.toolkit)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for CatalogToolAdapter {
    fn name(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> JsonValue {
        self.schema.to_json_schema()
    }

    fn prepare_input(&self, input: JsonValue) -> Result<JsonValue> {
        self.schema.validate(&input)
    }

    /// Authorize, then execute
    ///
    /// Pending authorization is a normal result carrying an
    /// [`AuthorizationPrompt`]; transport errors from either call are
    /// returned as-is.
    async fn execute(&self, input: JsonValue) -> Result<ToolResult> {
        let auth = self.client.authorize(&self.id, CALLER_ID).await?;

        if !auth.is_completed() {
            info!(
                tool_id = %self.id,
                status = auth.status.as_deref().unwrap_or("unknown"),
                "Tool requires authorization"
            );
            let prompt = serde_json::to_value(AuthorizationPrompt::new(auth.url))?;
            return Ok(ToolResult::success(prompt));
        }

        let output = self.client.execute(&self.id, CALLER_ID, input).await?;
        Ok(ToolResult::success(output))
    }
}
