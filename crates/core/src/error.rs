//! Core Error Types
//!
//! Defines the foundational error types used across the allocation workspace.
//! These error types only need thiserror + std so the core crate stays free of
//! storage and HTTP dependencies.
//!
//! The service crate extends these with additional variants (Database,
//! Sqlite, Forbidden, ...) that need heavier dependencies.

use thiserror::Error;

/// Core error type for the allocation workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Flag store could not be read
    #[error("Flag store error: {0}")]
    FlagStore(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a flag store error
    pub fn flag_store(msg: impl Into<String>) -> Self {
        Self::FlagStore(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
