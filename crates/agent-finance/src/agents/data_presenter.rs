//! Data presenting agent

use agent_core::{Agent, Context, Result};
use agent_runtime::{AgentProfile, AgentRuntime, HostedAgent};
use async_trait::async_trait;
use chrono::{DateTime, Local};

use super::AgentKind;

const DESCRIPTION: &str = "Presents and summarizes collected financial data.";

/// Hosted agent without tools that summarizes what is on the thread
pub struct DataPresenterAgent {
    agent: HostedAgent,
}

impl DataPresenterAgent {
    pub async fn new(
        runtime: &AgentRuntime,
        instructions: &str,
        created: DateTime<Local>,
    ) -> Result<Self> {
        let profile = AgentProfile::new(AgentKind::Presenter.agent_name(created), instructions)
            .with_description(DESCRIPTION);
        let agent = runtime.create_simple_agent(profile).await?;
        Ok(Self { agent })
    }

    pub fn id(&self) -> &str {
        self.agent.id()
    }

    pub async fn delete(&self) -> Result<()> {
        self.agent.delete().await
    }
}

#[async_trait]
impl Agent for DataPresenterAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        self.agent.process(input, context).await
    }

    fn name(&self) -> &str {
        self.agent.name()
    }
}
