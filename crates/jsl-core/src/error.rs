//! Unified error types for jsl

use thiserror::Error;

/// Unified error type for all jsl operations
#[derive(Error, Debug)]
pub enum JslError {
    // Git errors
    #[error("git command failed: {0}")]
    GitCommand(String),

    #[error("git lookup failed: {0}")]
    GitLookup(String),

    // Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using JslError
pub type Result<T> = std::result::Result<T, JslError>;
