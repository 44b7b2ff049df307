//! Data collecting agent

use agent_core::{Agent, Context, Result};
use agent_runtime::{AgentProfile, AgentRuntime, HostedAgent};
use agent_tools::ToolRegistry;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::sync::Arc;

use super::AgentKind;

const DESCRIPTION: &str = "Collects financial data from Neon and Alpha Vantage.";

/// Hosted agent that answers with the finance tools it was given
pub struct DataCollectorAgent {
    agent: HostedAgent,
}

impl DataCollectorAgent {
    /// Register the collector; `tools` is the complete set it may call
    pub async fn new(
        runtime: &AgentRuntime,
        tools: Arc<ToolRegistry>,
        instructions: &str,
        created: DateTime<Local>,
    ) -> Result<Self> {
        let profile = AgentProfile::new(AgentKind::Collector.agent_name(created), instructions)
            .with_description(DESCRIPTION);
        let agent = runtime.create_agent_with_tools(profile, tools).await?;
        Ok(Self { agent })
    }

    pub fn id(&self) -> &str {
        self.agent.id()
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.agent.tool_names()
    }

    pub async fn delete(&self) -> Result<()> {
        self.agent.delete().await
    }
}

#[async_trait]
impl Agent for DataCollectorAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        self.agent.process(input, context).await
    }

    fn name(&self) -> &str {
        self.agent.name()
    }
}
