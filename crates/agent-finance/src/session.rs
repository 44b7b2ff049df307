//! A collector/presenter session on one conversation thread

use agent_core::{Agent, Context};
use agent_runtime::AgentRuntime;
use agent_workflow::{StepOutput, Workflow};
use chrono::Local;
use std::sync::Arc;
use tracing::{info, warn};

use crate::agents::{AgentKind, DataCollectorAgent, DataPresenterAgent};
use crate::error::Result;
use crate::policy::SessionPlan;
use crate::tools::FinanceToolbox;
use crate::transcript::Transcript;

/// What a finished session produced
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub thread_id: String,
    pub collector_id: String,
    pub presenter_id: String,
    pub steps: Vec<StepOutput>,
    pub transcript: Transcript,
}

/// Runs a [`SessionPlan`] against the agent service
///
/// Creates both agents, posts every task to a fresh thread in plan order and
/// collects the resulting conversation. The hosted agents are deleted
/// afterwards, whether or not the session succeeded, unless `keep_agents` is
/// set.
pub struct FinanceSession {
    runtime: Arc<AgentRuntime>,
    toolbox: Arc<FinanceToolbox>,
    keep_agents: bool,
}

impl FinanceSession {
    pub fn new(runtime: Arc<AgentRuntime>, toolbox: Arc<FinanceToolbox>) -> Self {
        Self {
            runtime,
            toolbox,
            keep_agents: false,
        }
    }

    pub fn with_keep_agents(mut self, keep_agents: bool) -> Self {
        self.keep_agents = keep_agents;
        self
    }

    /// Run every task of `plan`; `user` is recorded in the context for logs
    pub async fn run(&self, plan: &SessionPlan, user: Option<&str>) -> Result<SessionReport> {
        let created = Local::now();
        let tools = Arc::new(self.toolbox.registry_for(&plan.collector_tools)?);

        let collector = Arc::new(
            DataCollectorAgent::new(&self.runtime, tools, &plan.collector_instructions, created)
                .await?,
        );
        let presenter =
            match DataPresenterAgent::new(&self.runtime, &plan.presenter_instructions, created)
                .await
            {
                Ok(presenter) => Arc::new(presenter),
                Err(e) => {
                    self.cleanup(&collector, None).await;
                    return Err(e.into());
                }
            };
        info!(
            collector_id = collector.id(),
            presenter_id = presenter.id(),
            tools = ?collector.tool_names(),
            "Agents created"
        );

        let outcome = self.converse(plan, &collector, &presenter, user).await;
        self.cleanup(&collector, Some(presenter.as_ref())).await;
        outcome
    }

    async fn converse(
        &self,
        plan: &SessionPlan,
        collector: &Arc<DataCollectorAgent>,
        presenter: &Arc<DataPresenterAgent>,
        user: Option<&str>,
    ) -> Result<SessionReport> {
        let thread_id = self.runtime.create_thread().await?;
        let mut context = Context::new().with_thread_id(thread_id.clone());
        if let Some(user) = user {
            context = context.with_user_id(user);
        }

        let mut builder = Workflow::builder();
        for task in &plan.tasks {
            let agent: Arc<dyn Agent> = match task.agent {
                AgentKind::Collector => Arc::clone(collector) as Arc<dyn Agent>,
                AgentKind::Presenter => Arc::clone(presenter) as Arc<dyn Agent>,
            };
            builder = builder.step(task.label, agent, task.instruction.clone());
        }
        let steps = builder.build()?.execute(&mut context).await?;

        let messages = self.runtime.list_messages(&thread_id).await?;
        info!(thread_id = %thread_id, messages = messages.len(), "Session finished");

        Ok(SessionReport {
            thread_id,
            collector_id: collector.id().to_string(),
            presenter_id: presenter.id().to_string(),
            steps,
            transcript: Transcript::from_messages(&messages),
        })
    }

    async fn cleanup(&self, collector: &DataCollectorAgent, presenter: Option<&DataPresenterAgent>) {
        if self.keep_agents {
            info!(
                collector_id = collector.id(),
                presenter_id = presenter.map(DataPresenterAgent::id),
                "Keeping hosted agents"
            );
            return;
        }

        if let Err(e) = collector.delete().await {
            warn!(agent_id = collector.id(), error = %e, "Failed to delete collector");
        }
        if let Some(presenter) = presenter {
            if let Err(e) = presenter.delete().await {
                warn!(agent_id = presenter.id(), error = %e, "Failed to delete presenter");
            }
        }
    }
}
