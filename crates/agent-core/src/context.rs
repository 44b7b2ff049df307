//! Execution context for agents
//!
//! The `Context` struct is a key-value store that carries session state
//! (conversation thread, acting user) between the steps of a session.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known context keys
pub mod keys {
    /// Username the session acts on behalf of
    pub const USER_ID: &str = "user_id";
    /// Identifier of the conversation thread on the agent service
    pub const THREAD_ID: &str = "thread_id";
    /// Identifier of the most recent run on the thread
    pub const LAST_RUN_ID: &str = "last_run_id";
    /// Final status of the most recent run on the thread
    pub const LAST_RUN_STATUS: &str = "last_run_status";
}

/// Context passed to agents during execution
///
/// # Example
///
/// ```
/// use agent_core::Context;
///
/// let ctx = Context::new()
///     .with_user_id("user_b")
///     .with_thread_id("thread_abc");
///
/// assert_eq!(ctx.user_id(), Some("user_b"));
/// assert_eq!(ctx.thread_id(), Some("thread_abc"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    data: HashMap<String, serde_json::Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    // =========== Builder Methods ===========

    /// Set the user ID
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.insert(keys::USER_ID, serde_json::json!(user_id.into()));
        self
    }

    /// Set the conversation thread ID
    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.set_thread_id(thread_id);
        self
    }

    // =========== Common Accessors ===========

    /// Get the user ID
    pub fn user_id(&self) -> Option<&str> {
        self.get(keys::USER_ID).and_then(|v| v.as_str())
    }

    /// Get the conversation thread ID
    pub fn thread_id(&self) -> Option<&str> {
        self.get(keys::THREAD_ID).and_then(|v| v.as_str())
    }

    /// Get the conversation thread ID, failing when it was never set
    pub fn require_thread_id(&self) -> crate::Result<&str> {
        self.thread_id()
            .ok_or(crate::Error::MissingContext(keys::THREAD_ID))
    }

    /// Set the conversation thread ID
    pub fn set_thread_id(&mut self, thread_id: impl Into<String>) {
        self.insert(keys::THREAD_ID, serde_json::json!(thread_id.into()));
    }

    /// Get the most recent run ID
    pub fn last_run_id(&self) -> Option<&str> {
        self.get(keys::LAST_RUN_ID).and_then(|v| v.as_str())
    }

    /// Record the most recent run ID
    pub fn set_last_run_id(&mut self, run_id: impl Into<String>) {
        self.insert(keys::LAST_RUN_ID, serde_json::json!(run_id.into()));
    }

    /// Get the final status of the most recent run
    pub fn last_run_status(&self) -> Option<&str> {
        self.get(keys::LAST_RUN_STATUS).and_then(|v| v.as_str())
    }

    /// Record the final status of the most recent run
    pub fn set_last_run_status(&mut self, status: impl Into<String>) {
        self.insert(keys::LAST_RUN_STATUS, serde_json::json!(status.into()));
    }

    // =========== Generic Key-Value Operations ===========

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Insert a typed value into the context
    ///
    /// Serializes the value to JSON before storing.
    pub fn insert_typed<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> crate::Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| {
            crate::Error::ProcessingFailed(format!("Failed to serialize context value: {e}"))
        })?;
        self.data.insert(key.into(), json_value);
        Ok(())
    }

    /// Get a typed value from the context
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> crate::Result<Option<T>> {
        match self.data.get(key) {
            None => Ok(None),
            Some(value) => {
                let typed = serde_json::from_value(value.clone()).map_err(|e| {
                    crate::Error::ProcessingFailed(format!(
                        "Failed to deserialize context value: {e}"
                    ))
                })?;
                Ok(Some(typed))
            }
        }
    }

    /// Check if a key exists in the context
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Remove a value from the context
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    /// Get the number of entries in the context
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the context is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
