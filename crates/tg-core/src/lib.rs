//! tg-core: toolgate core library
//!
//! ツールの抽象化（Tool trait）、ツールマネージャー、エラー型、
//! 設定読み込みのコア機能を提供します。

pub mod config;
pub mod error;
pub mod tool;

pub use config::{AgentConfig, CatalogConfig, Config, LoggingConfig};
pub use error::{Error, Result};
pub use tool::{Tool, ToolDefinition, ToolManager, ToolResult};
