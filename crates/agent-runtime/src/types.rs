//! Wire types of the agent service
//!
//! The service follows the assistants REST shape: agents, threads, messages
//! and runs, where a run pauses in `requires_action` whenever the model wants
//! a function tool executed.

use agent_tools::ToolDefinition;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

/// Everything needed to create a hosted agent
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSpec {
    /// Model deployment name
    pub model: String,
    /// Display name, unique per session
    pub name: String,
    /// Short description shown in the service portal
    pub description: Option<String>,
    /// System instructions
    pub instructions: String,
    /// Function tools the agent may call
    pub tools: Vec<ToolDefinition>,
}

impl AgentSpec {
    /// Request body for agent creation
    pub fn to_request_body(&self) -> Value {
        let tools: Vec<Value> = self.tools.iter().map(ToolDefinition::to_function_tool).collect();
        json!({
            "model": self.model,
            "name": self.name,
            "description": self.description,
            "instructions": self.instructions,
            "tools": tools,
        })
    }
}

/// A hosted agent as returned by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedAgentInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// A conversation thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    #[serde(default)]
    pub created_at: i64,
}

/// Author of a thread message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Assistant => f.write_str("assistant"),
        }
    }
}

/// Body of a text content part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub value: String,
}

/// One content part of a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextContent },
    /// Image files and other parts we do not render
    #[serde(other)]
    Unsupported,
}

/// A message on a thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub role: MessageRole,
    /// Unix timestamp (seconds)
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub content: Vec<MessageContent>,
    #[serde(default)]
    pub assistant_id: Option<String>,
    #[serde(default)]
    pub run_id: Option<String>,
}

impl ThreadMessage {
    /// Concatenated text parts, or `None` for messages without text
    pub fn text(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .content
            .iter()
            .filter_map(|part| match part {
                MessageContent::Text { text } => Some(text.value.as_str()),
                MessageContent::Unsupported => None,
            })
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }
}

/// Lifecycle status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Expired,
    Incomplete,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Whether the run can no longer change
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Cancelled | Self::Failed | Self::Completed | Self::Expired | Self::Incomplete
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::RequiresAction => "requires_action",
            Self::Cancelling => "cancelling",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::Completed => "completed",
            Self::Expired => "expired",
            Self::Incomplete => "incomplete",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Function name and raw JSON arguments of a tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments; may be empty
    #[serde(default)]
    pub arguments: String,
}

/// A tool call requested by a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_type")]
    pub kind: String,
    pub function: FunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

/// Output returned for one tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitToolOutputs {
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

/// Action a paused run is waiting for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredAction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub submit_tool_outputs: Option<SubmitToolOutputs>,
}

/// Error reported for a failed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A run of an agent on a thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    pub thread_id: String,
    #[serde(default)]
    pub assistant_id: Option<String>,
    pub status: RunStatus,
    #[serde(default)]
    pub required_action: Option<RequiredAction>,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

impl Run {
    /// Tool calls the run is waiting on (empty unless `requires_action`)
    pub fn pending_tool_calls(&self) -> &[ToolCall] {
        self.required_action
            .as_ref()
            .and_then(|action| action.submit_tool_outputs.as_ref())
            .map(|outputs| outputs.tool_calls.as_slice())
            .unwrap_or_default()
    }

    /// Human readable failure reason, if the service gave one
    pub fn error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(|err| {
            match (&err.code, &err.message) {
                (Some(code), Some(message)) => format!("{code}: {message}"),
                (None, Some(message)) => message.clone(),
                (Some(code), None) => code.clone(),
                (None, None) => "unknown error".to_string(),
            }
        })
    }
}

/// One page of a list response
#[derive(Debug, Clone, Deserialize)]
pub struct ListPage<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub last_id: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_with_required_action() {
        let run: Run = serde_json::from_value(json!({
            "id": "run_1",
            "object": "thread.run",
            "thread_id": "thread_1",
            "assistant_id": "asst_1",
            "status": "requires_action",
            "required_action": {
                "type": "submit_tool_outputs",
                "submit_tool_outputs": {
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "query_finance_data", "arguments": "{}"}
                    }]
                }
            },
            "last_error": null
        }))
        .unwrap();

        assert_eq!(run.status, RunStatus::RequiresAction);
        assert!(!run.status.is_terminal());
        assert_eq!(run.pending_tool_calls().len(), 1);
        assert_eq!(run.pending_tool_calls()[0].function.name, "query_finance_data");
    }

    #[test]
    fn test_unknown_status_is_tolerated() {
        let run: Run = serde_json::from_value(json!({
            "id": "run_1",
            "thread_id": "thread_1",
            "status": "paused_for_review"
        }))
        .unwrap();
        assert_eq!(run.status, RunStatus::Unknown);
        assert!(run.pending_tool_calls().is_empty());
    }

    #[test]
    fn test_message_text_skips_images() {
        let message: ThreadMessage = serde_json::from_value(json!({
            "id": "msg_1",
            "role": "assistant",
            "created_at": 1_717_000_000,
            "content": [
                {"type": "image_file", "image_file": {"file_id": "f"}},
                {"type": "text", "text": {"value": "IBM revenue: 75000", "annotations": []}}
            ],
            "assistant_id": "asst_1",
            "run_id": "run_1"
        }))
        .unwrap();

        assert_eq!(message.text().as_deref(), Some("IBM revenue: 75000"));
    }

    #[test]
    fn test_run_error_message() {
        let run = Run {
            id: "run_1".to_string(),
            thread_id: "thread_1".to_string(),
            assistant_id: None,
            status: RunStatus::Failed,
            required_action: None,
            last_error: Some(RunError {
                code: Some("rate_limit_exceeded".to_string()),
                message: Some("Too many requests".to_string()),
            }),
        };
        assert_eq!(
            run.error_message().as_deref(),
            Some("rate_limit_exceeded: Too many requests")
        );
    }

    #[test]
    fn test_agent_spec_body() {
        let spec = AgentSpec {
            model: "gpt-4o".to_string(),
            name: "data-presenter-202610141200".to_string(),
            description: None,
            instructions: "Summarize.".to_string(),
            tools: vec![],
        };
        let body = spec.to_request_body();
        assert_eq!(body["model"], "gpt-4o");
        assert!(body["tools"].as_array().unwrap().is_empty());
    }
}
