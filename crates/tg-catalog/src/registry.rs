//! Catalog Registry
//!
//! 設定されたツールキットとツールを ToolManager に一括登録

use std::sync::Arc;
use tracing::{info, warn};

use tg_core::{Config, Tool, ToolManager};

use crate::client::{CatalogClient, HttpCatalogClient};
use crate::fetcher::CatalogFetcher;

/// Register every configured toolkit and tool with the ToolManager
///
/// A toolkit or tool that fails to load is logged and skipped so one bad
/// entry does not take the others down.
///
/// # Returns
/// The number of distinct tool identities added. Re-registering an identity
/// that is already present replaces it without counting again.
pub async fn register_catalog_tools(
    fetcher: &CatalogFetcher,
    toolkits: &[String],
    tool_names: &[String],
    tool_manager: &mut ToolManager,
) -> usize {
    let mut total_tools = 0;

    for toolkit in toolkits {
        match fetcher.list_toolkit(toolkit).await {
            Ok(tools) => {
                for (_, adapter) in tools {
                    info!(
                        toolkit = toolkit.as_str(),
                        tool_id = adapter.tool_id(),
                        "Registered catalog tool"
                    );
                    total_tools += register_new(tool_manager, adapter);
                }
            }
            Err(e) => {
                warn!(toolkit = toolkit.as_str(), error = %e, "Skipping toolkit");
            }
        }
    }

    for name in tool_names {
        match fetcher.get_one(name).await {
            Ok(adapter) => {
                info!(tool_id = adapter.name(), "Registered catalog tool");
                total_tools += register_new(tool_manager, Arc::new(adapter));
            }
            Err(e) => {
                warn!(tool_name = name.as_str(), error = %e, "Skipping tool");
            }
        }
    }

    info!(total_tools = total_tools, "Catalog tools registered");
    total_tools
}

/// Register a tool, returning 1 when its identity was not yet present
fn register_new(tool_manager: &mut ToolManager, tool: Arc<dyn Tool>) -> usize {
    let is_new = !tool_manager.contains(tool.name());
    tool_manager.register(tool);
    usize::from(is_new)
}

/// Convenience function to build an HTTP fetcher from config and
/// register the configured tools
pub async fn initialize_catalog_tools(
    config: &Config,
    tool_manager: &mut ToolManager,
) -> tg_core::Result<usize> {
    let client: Arc<dyn CatalogClient> = Arc::new(HttpCatalogClient::new(&config.catalog)?);
    let fetcher = CatalogFetcher::new(client);

    if config.toolkits.is_empty() && config.tools.is_empty() {
        info!("No toolkits or tools configured");
        return Ok(0);
    }

    Ok(register_catalog_tools(&fetcher, &config.toolkits, &config.tools, tool_manager).await)
}
