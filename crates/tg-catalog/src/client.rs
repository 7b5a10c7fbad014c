//! Catalog client
//!
//! カタログサービス（ツール一覧・取得・認可・実行）と通信するクライアント

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use tg_core::{CatalogConfig, Error, Result};

use crate::types::{AuthorizationResponse, AuthorizeRequest, CatalogTool, ExecuteRequest, ToolPage};

/// Operations the adapter layer needs from the catalog service
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// List the tools of one toolkit (first page only)
    async fn list_tools(&self, toolkit: &str) -> Result<ToolPage>;

    /// Fetch a single tool definition by name
    async fn get_tool(&self, name: &str) -> Result<CatalogTool>;

    /// Request authorization for a tool on behalf of a user
    async fn authorize(&self, tool_id: &str, user_id: &str) -> Result<AuthorizationResponse>;

    /// Execute a tool; the response body is returned as-is
    async fn execute(&self, tool_id: &str, user_id: &str, input: JsonValue) -> Result<JsonValue>;
}

/// HTTP implementation of [`CatalogClient`]
#[derive(Clone)]
pub struct HttpCatalogClient {
    client: Client,
    api_key: String,
    base_url: String,
    page_size: u32,
}

impl HttpCatalogClient {
    /// Create a new client from the catalog configuration
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and decode the JSON body
    ///
    /// Non-2xx responses and undecodable bodies become `Error::CatalogApi`.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            warn!(status = %status, "Catalog API error: {}", body);
            return Err(Error::CatalogApi(format!("{}: {}", status, body)));
        }

        serde_json::from_str(&body).map_err(|e| {
            Error::CatalogApi(format!("Failed to parse response: {} - {}", e, body))
        })
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn list_tools(&self, toolkit: &str) -> Result<ToolPage> {
        let url = self.endpoint("tools");
        debug!(toolkit = toolkit, "Listing catalog tools: {}", url);

        let page: ToolPage = self
            .send_json(self.client.get(&url).query(&[
                ("toolkit", toolkit.to_string()),
                ("limit", self.page_size.to_string()),
            ]))
            .await?;

        if let Some(total) = page.total_count {
            if total > page.items.len() as u64 {
                warn!(
                    toolkit = toolkit,
                    total_count = total,
                    returned = page.items.len(),
                    "Toolkit has more tools than one page; only the first page is used"
                );
            }
        }

        Ok(page)
    }

    async fn get_tool(&self, name: &str) -> Result<CatalogTool> {
        let url = self.endpoint(&format!("tools/{}", urlencoding::encode(name)));
        debug!(tool_name = name, "Fetching catalog tool: {}", url);

        self.send_json(self.client.get(&url)).await
    }

    async fn authorize(&self, tool_id: &str, user_id: &str) -> Result<AuthorizationResponse> {
        let url = self.endpoint("tools/authorize");
        debug!(tool_id = tool_id, "Authorizing tool");

        self.send_json(self.client.post(&url).json(&AuthorizeRequest {
            tool_name: tool_id,
            user_id,
        }))
        .await
    }

    async fn execute(&self, tool_id: &str, user_id: &str, input: JsonValue) -> Result<JsonValue> {
        let url = self.endpoint("tools/execute");
        debug!(tool_id = tool_id, "Executing tool");

        self.send_json(self.client.post(&url).json(&ExecuteRequest {
            tool_name: tool_id,
            user_id,
            input: &input,
        }))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> CatalogConfig {
        CatalogConfig {
            api_key: "key".to_string(),
            base_url: base_url.to_string(),
            ..CatalogConfig::default()
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpCatalogClient::new(&config("https://api.example.com/")).unwrap();
        assert_eq!(client.base_url(), "https://api.example.com");
    }

    #[test]
    fn test_endpoint() {
        let client = HttpCatalogClient::new(&config("http://localhost:9099")).unwrap();
        assert_eq!(client.endpoint("tools"), "http://localhost:9099/v1/tools");
        assert_eq!(
            client.endpoint("/tools/authorize"),
            "http://localhost:9099/v1/tools/authorize"
        );
    }
}
