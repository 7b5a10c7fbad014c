//! tg-catalog: remote tool catalog integration
//!
//! カタログサービスのツール定義を取得し、tg-core の Tool trait に適合させる機能を提供します。
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tg_catalog::{CatalogFetcher, HttpCatalogClient};
//!
//! let client = Arc::new(HttpCatalogClient::new(&config.catalog)?);
//! let fetcher = CatalogFetcher::new(client);
//! let tools = fetcher.list_toolkit("github").await?;
//! ```

pub mod adapter;
pub mod client;
pub mod fetcher;
pub mod registry;
pub mod schema;
pub mod types;

pub use adapter::{AuthorizationPrompt, CatalogToolAdapter, CALLER_ID, resolve_tool_id};
pub use client::{CatalogClient, HttpCatalogClient};
pub use fetcher::CatalogFetcher;
pub use registry::{initialize_catalog_tools, register_catalog_tools};
pub use schema::{FieldType, InputSchema, Parameter, SchemaField, ValueSchema, ValueType};
pub use types::{AuthorizationResponse, CatalogTool, ToolInput, ToolPage, Toolkit};
