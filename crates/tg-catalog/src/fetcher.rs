//! Catalog fetcher
//!
//! Fetches tool definitions from the catalog and adapts them. Nothing is
//! cached: every call is one round trip and builds fresh adapters.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use tg_core::Result;

use crate::adapter::CatalogToolAdapter;
use crate::client::CatalogClient;
use crate::types::ToolPage;

pub struct CatalogFetcher {
    client: Arc<dyn CatalogClient>,
}

impl CatalogFetcher {
    pub fn new(client: Arc<dyn CatalogClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<dyn CatalogClient> {
        &self.client
    }

    /// Fetch every tool of a toolkit, keyed by short tool name
    ///
    /// Tools sharing a name overwrite each other; the last one listed wins.
    pub async fn list_toolkit(
        &self,
        toolkit: &str,
    ) -> Result<HashMap<String, Arc<CatalogToolAdapter>>> {
        let page = self.client.list_tools(toolkit).await?;
        let tools = self.adapt_page(page);

        info!(toolkit = toolkit, tool_count = tools.len(), "Fetched toolkit");
        Ok(tools)
    }

    /// Fetch and adapt a single tool by name
    pub async fn get_one(&self, tool_name: &str) -> Result<CatalogToolAdapter> {
        let tool = self.client.get_tool(tool_name).await?;
        let adapter = CatalogToolAdapter::new(Arc::clone(&self.client), tool);

        info!(tool_name = tool_name, tool_id = adapter.tool_id(), "Fetched tool");
        Ok(adapter)
    }

    /// Adapt a listing page in service order
    pub fn adapt_page(&self, page: ToolPage) -> HashMap<String, Arc<CatalogToolAdapter>> {
        page.items
            .into_iter()
            .fold(HashMap::new(), |mut tools, tool| {
                let name = tool.name.clone();
                let adapter = CatalogToolAdapter::new(Arc::clone(&self.client), tool);
                tools.insert(name, Arc::new(adapter));
                tools
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AuthorizationResponse, CatalogTool, Toolkit};
    use async_trait::async_trait;
    use serde_json::{json, Value as JsonValue};
    use tg_core::{Error, Tool};

    struct StaticCatalog;

    fn tool(name: &str, fqn: Option<&str>, description: &str) -> CatalogTool {
        CatalogTool {
            name: name.to_string(),
            fully_qualified_name: fqn.map(str::to_string),
            description: Some(description.to_string()),
            toolkit: Toolkit {
                name: "Github".to_string(),
                version: "0.1.0".to_string(),
                description: None,
            },
            input: Default::default(),
        }
    }

    #[async_trait]
    impl CatalogClient for StaticCatalog {
        async fn list_tools(&self, toolkit: &str) -> Result<ToolPage> {
            if toolkit != "Github" {
                return Err(Error::CatalogApi("404 Not Found".to_string()));
            }
            Ok(ToolPage {
                items: vec![
                    tool("ListRepos", Some("Github.ListRepos"), "first"),
                    tool("CreateIssue", None, "create"),
                    tool("ListRepos", Some("Github.ListRepos@2"), "second"),
                ],
                ..Default::default()
            })
        }

        async fn get_tool(&self, name: &str) -> Result<CatalogTool> {
            Ok(tool(name, None, "single"))
        }

        async fn authorize(&self, _tool_id: &str, _user_id: &str) -> Result<AuthorizationResponse> {
            Ok(AuthorizationResponse::default())
        }

        async fn execute(&self, _tool_id: &str, _user_id: &str, _input: JsonValue) -> Result<JsonValue> {
            Ok(json!(null))
        }
    }

    #[tokio::test]
    async fn test_list_toolkit_keys_by_name_last_wins() {
        let fetcher = CatalogFetcher::new(Arc::new(StaticCatalog));
        let tools = fetcher.list_toolkit("Github").await.unwrap();

        assert_eq!(tools.len(), 2);
        let repos = &tools["ListRepos"];
        assert_eq!(repos.tool_id(), "Github.ListRepos@2");
        assert_eq!(repos.description(), "second");
        assert_eq!(tools["CreateIssue"].tool_id(), "CreateIssue.Github@0.1.0");
    }

    #[tokio::test]
    async fn test_list_toolkit_error_propagates() {
        let fetcher = CatalogFetcher::new(Arc::new(StaticCatalog));
        assert!(fetcher.list_toolkit("Slack").await.is_err());
    }

    #[tokio::test]
    async fn test_get_one() {
        let fetcher = CatalogFetcher::new(Arc::new(StaticCatalog));
        let adapter = fetcher.get_one("Star").await.unwrap();

        assert_eq!(adapter.tool_id(), "Star.Github@0.1.0");
        assert_eq!(adapter.description(), "single");
        assert!(adapter.schema().is_empty());
    }
}
