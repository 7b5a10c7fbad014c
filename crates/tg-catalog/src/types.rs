//! Catalog wire types
//!
//! カタログサービスとやり取りする JSON の型定義

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Authorization status the catalog reports once a tool may run
pub const AUTH_STATUS_COMPLETED: &str = "completed";

/// Named, versioned grouping of tools
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Toolkit {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Input section of a tool definition
///
/// `parameters` stays raw JSON: a malformed list must degrade to an
/// empty schema rather than fail the whole catalog response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub parameters: Option<JsonValue>,
}

/// Tool definition as returned by the catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogTool {
    /// Short tool name, e.g. `CreateIssue`
    pub name: String,
    /// Fully qualified name, e.g. `Github.CreateIssue`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fully_qualified_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub toolkit: Toolkit,
    #[serde(default)]
    pub input: ToolInput,
}

/// One page of a toolkit listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolPage {
    #[serde(default)]
    pub items: Vec<CatalogTool>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// Authorization check result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Where the end user completes authorization
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub scopes: Option<Vec<String>>,
}

impl AuthorizationResponse {
    /// Whether the tool may be executed now
    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some(AUTH_STATUS_COMPLETED)
    }
}

/// Body of `POST /v1/tools/authorize`
#[derive(Debug, Serialize)]
pub struct AuthorizeRequest<'a> {
    pub tool_name: &'a str,
    pub user_id: &'a str,
}

/// Body of `POST /v1/tools/execute`
#[derive(Debug, Serialize)]
pub struct ExecuteRequest<'a> {
    pub tool_name: &'a str,
    pub user_id: &'a str,
    pub input: &'a JsonValue,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_tool_deserialize() {
        let tool: CatalogTool = serde_json::from_value(json!({
            "name": "CreateIssue",
            "fully_qualified_name": "Github.CreateIssue@0.1.0",
            "description": "Create an issue",
            "toolkit": {"name": "Github", "version": "0.1.0"},
            "input": {"parameters": [{"name": "title", "required": true,
                "value_schema": {"val_type": "string"}}]},
            "requirements": {"authorization": {"provider_id": "github"}}
        }))
        .unwrap();

        assert_eq!(tool.name, "CreateIssue");
        assert_eq!(tool.toolkit.version, "0.1.0");
        assert!(tool.input.parameters.as_ref().unwrap().is_array());
    }

    #[test]
    fn test_catalog_tool_minimal() {
        let tool: CatalogTool = serde_json::from_value(json!({
            "name": "Ping",
            "toolkit": {"name": "Util"}
        }))
        .unwrap();

        assert!(tool.fully_qualified_name.is_none());
        assert!(tool.description.is_none());
        assert!(tool.input.parameters.is_none());
        assert_eq!(tool.toolkit.version, "");
    }

    #[test]
    fn test_authorization_status() {
        let auth: AuthorizationResponse =
            serde_json::from_value(json!({"status": "completed"})).unwrap();
        assert!(auth.is_completed());

        let auth: AuthorizationResponse =
            serde_json::from_value(json!({"status": "pending", "url": "https://auth"})).unwrap();
        assert!(!auth.is_completed());
        assert_eq!(auth.url.as_deref(), Some("https://auth"));

        assert!(!AuthorizationResponse::default().is_completed());
    }

    #[test]
    fn test_execute_request_serialize() {
        let input = json!({"owner": "me"});
        let body = serde_json::to_value(ExecuteRequest {
            tool_name: "Github.ListRepos",
            user_id: "u",
            input: &input,
        })
        .unwrap();
        assert_eq!(body, json!({"tool_name": "Github.ListRepos", "user_id": "u", "input": {"owner": "me"}}));
    }
}
