//! Error types for the agent service client

use thiserror::Error;

/// Result type for agent service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors raised while talking to the agent service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Network or HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid or expired access token
    #[error("Agent service rejected the access token")]
    AuthenticationFailed,

    /// Referenced agent, thread or run does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Service throttled the request
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Any other non-success response
    #[error("Agent service error {status}: {body}")]
    Api { status: u16, body: String },

    /// Project connection string could not be parsed
    #[error("Invalid project connection string: {0}")]
    InvalidConnectionString(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Run did not reach a terminal status in time
    #[error("Run {run_id} did not finish after {polls} polls")]
    RunTimedOut { run_id: String, polls: usize },
}

impl From<agent_utils::ConfigError> for ServiceError {
    fn from(err: agent_utils::ConfigError) -> Self {
        ServiceError::Configuration(err.to_string())
    }
}

/// Convert ServiceError to agent_core::Error
impl From<ServiceError> for agent_core::Error {
    fn from(err: ServiceError) -> Self {
        agent_core::Error::ProcessingFailed(err.to_string())
    }
}
