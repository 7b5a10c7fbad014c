//! toolgate: catalog tool gateway binary
//!
//! Usage:
//!   toolgate                         - List the configured catalog tools
//!   toolgate --export                - Print agent profile and tool definitions as JSON
//!   toolgate --call <tool> [<json>]  - Validate and execute one tool
//!   toolgate --help                  - Show help

use serde_json::{json, Value as JsonValue};
use tg_catalog::initialize_catalog_tools;
use tg_core::{Config, Tool, ToolManager};
use tracing_subscriber::EnvFilter;

/// Run mode
#[derive(Debug, PartialEq)]
enum RunMode {
    /// Print tool ids and descriptions
    List,
    /// Print agent profile and tool definitions
    Export,
    /// Execute one tool
    Call { tool: String, input: JsonValue },
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode = parse_args(&args)?;

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("toolgate {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(config.logging.level.parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(base_url = %config.catalog.base_url, "Starting toolgate");

    let mut tool_manager = ToolManager::new();
    initialize_catalog_tools(&config, &mut tool_manager)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize catalog tools: {}", e))?;

    match mode {
        RunMode::List => {
            list_tools(&tool_manager);
            Ok(())
        }
        RunMode::Export => {
            let export = export_definitions(&config, &tool_manager);
            println!("{}", serde_json::to_string_pretty(&export)?);
            Ok(())
        }
        RunMode::Call { tool, input } => call_tool(&tool_manager, &tool, input).await,
        _ => Ok(()),
    }
}

/// Parse command line arguments (without the program name)
fn parse_args(args: &[String]) -> anyhow::Result<RunMode> {
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--list" | "-l" => return Ok(RunMode::List),
            "--export" | "-e" => return Ok(RunMode::Export),
            "--call" => {
                let tool = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--call requires a tool id"))?
                    .clone();
                let input = match iter.next() {
                    Some(raw) => serde_json::from_str(raw)
                        .map_err(|e| anyhow::anyhow!("Invalid JSON input: {}", e))?,
                    None => json!({}),
                };
                return Ok(RunMode::Call { tool, input });
            }
            "--help" | "-h" => return Ok(RunMode::Help),
            "--version" | "-v" => return Ok(RunMode::Version),
            other => anyhow::bail!("Unknown argument: {}", other),
        }
    }

    Ok(RunMode::List)
}

/// Print help message
fn print_help() {
    println!("toolgate - remote tool catalog gateway");
    println!();
    println!("Usage:");
    println!("  toolgate                         List configured catalog tools");
    println!("  toolgate --export                Print agent profile and tool definitions (JSON)");
    println!("  toolgate --call <tool> [<json>]  Validate and execute one tool");
    println!("  toolgate --help                  Show this help message");
    println!("  toolgate --version               Show version");
    println!();
    println!("Configuration is read from ./toolgate.toml when present.");
    println!();
    println!("Environment Variables:");
    println!("  TOOLGATE_API_KEY       Catalog API key (required)");
    println!("  TOOLGATE_BASE_URL      Catalog base URL (default: https://api.arcade.dev)");
    println!("  TOOLGATE_TIMEOUT_SECS  Request timeout in seconds (default: 60)");
    println!("  TOOLGATE_TOOLKITS      Comma separated toolkits to load (default: github)");
    println!("  TOOLGATE_TOOLS         Comma separated individual tools to load");
    println!("  TOOLGATE_MODEL         Agent model (default: gpt-4o)");
    println!("  TOOLGATE_LOG_LEVEL     Default log level (default: info)");
}

fn list_tools(tool_manager: &ToolManager) {
    if tool_manager.is_empty() {
        println!("No tools registered");
        return;
    }

    for name in tool_manager.tool_names() {
        let description = tool_manager
            .get(name)
            .map(|t| t.description().to_string())
            .unwrap_or_default();
        println!("{:<40} {}", name, description);
    }
}

fn export_definitions(config: &Config, tool_manager: &ToolManager) -> JsonValue {
    json!({
        "agent": config.agent,
        "tools": tool_manager.definitions(),
    })
}

async fn call_tool(tool_manager: &ToolManager, tool: &str, input: JsonValue) -> anyhow::Result<()> {
    let result = tool_manager
        .execute(tool, input)
        .await
        .map_err(|e| anyhow::anyhow!("Tool call failed: {}", e))?;

    println!("{}", result.output_text());

    if result.is_error {
        anyhow::bail!("Tool {} reported an error", tool);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_default_is_list() {
        assert_eq!(parse_args(&[]).unwrap(), RunMode::List);
        assert_eq!(parse_args(&args(&["--list"])).unwrap(), RunMode::List);
    }

    #[test]
    fn test_parse_args_call() {
        let mode = parse_args(&args(&["--call", "Github.ListRepos", r#"{"owner":"me"}"#])).unwrap();
        assert_eq!(
            mode,
            RunMode::Call {
                tool: "Github.ListRepos".to_string(),
                input: json!({"owner": "me"}),
            }
        );

        let mode = parse_args(&args(&["--call", "Github.WhoAmI"])).unwrap();
        assert_eq!(
            mode,
            RunMode::Call {
                tool: "Github.WhoAmI".to_string(),
                input: json!({}),
            }
        );
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&["--call"])).is_err());
        assert!(parse_args(&args(&["--call", "x", "{not json"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_parse_args_flags() {
        assert_eq!(parse_args(&args(&["-h"])).unwrap(), RunMode::Help);
        assert_eq!(parse_args(&args(&["--version"])).unwrap(), RunMode::Version);
        assert_eq!(parse_args(&args(&["--export"])).unwrap(), RunMode::Export);
    }

    #[test]
    fn test_export_definitions_empty() {
        let mut config = Config::default();
        config.agent.model = "gpt-4o-mini".to_string();
        let export = export_definitions(&config, &ToolManager::new());

        assert_eq!(export["agent"]["model"], "gpt-4o-mini");
        assert_eq!(export["tools"], json!([]));
    }
}
