//! Tool system for agent tool calls
//!
//! This module provides the tool abstraction that catalog tools are
//! adapted into, plus the manager the agent calls them through.

pub mod definition;
pub mod manager;
pub mod traits;

pub use definition::ToolDefinition;
pub use manager::ToolManager;
pub use traits::{Tool, ToolResult};
