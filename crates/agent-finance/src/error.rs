//! Error types for finance data operations

use std::path::PathBuf;
use thiserror::Error;

/// Finance data specific errors
#[derive(Debug, Error)]
pub enum FinanceError {
    /// Database query or connection failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider answered with a non-success HTTP status
    #[error("{provider} returned HTTP {status}: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// Provider answered 200 but reported an error in the body
    #[error("{provider} error: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// Rate limit exceeded for API
    #[error("Rate limit exceeded for {provider}: {message}")]
    RateLimitExceeded {
        provider: &'static str,
        message: String,
    },

    /// The provider had nothing for the request
    #[error("No data available for {0}")]
    NoData(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The role file could not be read
    #[error("Cannot read role file {path}: {source}")]
    RoleFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The role file is not valid YAML of the expected shape
    #[error("Invalid role file {path}: {source}")]
    RoleFormat {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for finance operations
pub type Result<T> = std::result::Result<T, FinanceError>;

/// Convert FinanceError to agent_core::Error
impl From<FinanceError> for agent_core::Error {
    fn from(err: FinanceError) -> Self {
        agent_core::Error::ProcessingFailed(err.to_string())
    }
}

/// Convert agent_core::Error to FinanceError
impl From<agent_core::Error> for FinanceError {
    fn from(err: agent_core::Error) -> Self {
        FinanceError::Other(err.to_string())
    }
}

impl From<agent_utils::ConfigError> for FinanceError {
    fn from(err: agent_utils::ConfigError) -> Self {
        FinanceError::Config(err.to_string())
    }
}

impl From<agent_runtime::ServiceError> for FinanceError {
    fn from(err: agent_runtime::ServiceError) -> Self {
        FinanceError::Other(err.to_string())
    }
}
