//! Hosted agent implementation (wraps RunExecutor)

use crate::executor::RunExecutor;
use crate::service::AgentService;
use crate::types::{HostedAgentInfo, MessageRole, RunStatus};
use agent_core::{Agent, Context, Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};

/// An agent that lives on the agent service
///
/// Each call to [`Agent::process`] appends the input as a user message to the
/// thread named in the context, runs the agent on that thread, and returns
/// the text of the assistant messages produced by that run.
///
/// # Example
///
/// ```no_run
/// use agent_core::{Agent, Context};
/// use agent_runtime::{AgentProfile, AgentRuntime};
///
/// # async fn example(runtime: AgentRuntime) -> agent_core::Result<()> {
/// let agent = runtime
///     .create_tool_agent(AgentProfile::new("data-collector", "Use your tools."))
///     .await?;
///
/// let mut context = Context::new().with_thread_id(runtime.create_thread().await?);
/// let reply = agent
///     .process("Query full finance data from the Neon database.".to_string(), &mut context)
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct HostedAgent {
    info: HostedAgentInfo,
    name: String,
    service: Arc<dyn AgentService>,
    executor: RunExecutor,
}

impl HostedAgent {
    /// Wrap an agent already registered on the service
    pub fn new(
        info: HostedAgentInfo,
        name: impl Into<String>,
        service: Arc<dyn AgentService>,
        executor: RunExecutor,
    ) -> Self {
        Self {
            info,
            name: name.into(),
            service,
            executor,
        }
    }

    /// Service-assigned agent ID
    pub fn id(&self) -> &str {
        &self.info.id
    }

    /// Names of the tools this agent's runs can call
    pub fn tool_names(&self) -> Vec<String> {
        self.executor.tools().names()
    }

    /// Remove the agent from the service
    pub async fn delete(&self) -> Result<()> {
        self.service.delete_agent(&self.info.id).await?;
        info!(agent_id = %self.info.id, agent_name = %self.name, "Hosted agent deleted");
        Ok(())
    }
}

#[async_trait]
impl Agent for HostedAgent {
    #[instrument(skip(self, input, context), fields(agent = %self.name, agent_id = %self.info.id))]
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        let thread_id = context.require_thread_id()?.to_string();

        self.service
            .create_message(&thread_id, MessageRole::User, &input)
            .await?;

        let run = self
            .executor
            .create_and_process_run(&thread_id, &self.info.id)
            .await?;
        context.set_last_run_id(run.id.clone());
        context.set_last_run_status(run.status.to_string());

        if run.status != RunStatus::Completed {
            let reason = run
                .error_message()
                .unwrap_or_else(|| "no error reported".to_string());
            return Err(Error::ProcessingFailed(format!(
                "run {} of {} ended with status {}: {reason}",
                run.id, self.name, run.status
            )));
        }

        let replies: Vec<String> = self
            .service
            .list_messages(&thread_id)
            .await?
            .into_iter()
            .filter(|m| m.role == MessageRole::Assistant && m.run_id.as_deref() == Some(run.id.as_str()))
            .filter_map(|m| m.text())
            .collect();

        Ok(replies.join("\n\n"))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
