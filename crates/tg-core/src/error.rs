//! Error types for tg-core

use thiserror::Error;

/// Main error type for tg-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog API error: {0}")]
    CatalogApi(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid tool input: {0}")]
    InvalidInput(String),

    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for tg-core
pub type Result<T> = std::result::Result<T, Error>;
