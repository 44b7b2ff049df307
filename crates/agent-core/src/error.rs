//! Error types for agent-core

use thiserror::Error;

/// Result type alias for agent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent operations
#[derive(Error, Debug)]
pub enum Error {
    /// Agent initialization failed
    #[error("Agent initialization failed: {0}")]
    InitializationFailed(String),

    /// Agent processing failed
    #[error("Agent processing failed: {0}")]
    ProcessingFailed(String),

    /// Tool parameters did not match the tool's input schema
    #[error("Invalid tool parameters for {tool}: {reason}")]
    InvalidParameters { tool: String, reason: String },

    /// No tool registered under the requested name
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// A required context entry was absent
    #[error("Missing context value: {0}")]
    MissingContext(&'static str),
}

impl Error {
    /// Build an `InvalidParameters` error for `tool`
    pub fn invalid_parameters(tool: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidParameters {
            tool: tool.into(),
            reason: reason.to_string(),
        }
    }
}
