//! The agent service seam

use crate::error::Result;
use crate::types::{AgentSpec, HostedAgentInfo, MessageRole, Run, Thread, ThreadMessage, ToolOutput};
use async_trait::async_trait;

/// Operations of an external agent service
///
/// The service owns agent definitions, conversation threads and runs. It
/// decides which registered tool a run needs; callers answer those requests
/// through [`AgentService::submit_tool_outputs`].
#[async_trait]
pub trait AgentService: Send + Sync {
    /// Register a hosted agent
    async fn create_agent(&self, spec: &AgentSpec) -> Result<HostedAgentInfo>;

    /// Remove a hosted agent
    async fn delete_agent(&self, agent_id: &str) -> Result<()>;

    /// Open a new conversation thread
    async fn create_thread(&self) -> Result<Thread>;

    /// Append a message to a thread
    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ThreadMessage>;

    /// Start a run of `agent_id` on a thread
    async fn create_run(&self, thread_id: &str, agent_id: &str) -> Result<Run>;

    /// Fetch the current state of a run
    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// Answer the tool calls of a run waiting in `requires_action`
    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run>;

    /// Ask the service to stop a run
    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// All messages of a thread, oldest first
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>>;
}
