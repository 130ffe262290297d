//! Error types for the agent mesh

use thiserror::Error;

/// Result type alias for mesh operations
pub type Result<T> = std::result::Result<T, MeshError>;

#[derive(Error, Debug)]
pub enum MeshError {

    // =============================
    // Core Errors
    // =============================

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Agent error: {0}")]
    AgentError(String),

    #[error("Tool error: {0}")]
    ToolError(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid tool input: {0}")]
    InvalidToolInput(String),

    #[error("Scrape error: {0}")]
    ScrapeError(String),

    #[error("Market data error: {0}")]
    MarketDataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
