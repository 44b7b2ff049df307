//! Runtime for creating hosted agents with dependency injection
//!
//! The AgentRuntime owns the agent service client, the default tool registry
//! and the model deployment, and provides factory methods that register
//! agents on the service and hand them back as [`HostedAgent`]s.

use agent_core::{Error, Result};
use agent_tools::ToolRegistry;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::agents::HostedAgent;
use crate::executor::{ExecutorConfig, RunExecutor};
use crate::service::AgentService;
use crate::types::{AgentSpec, ThreadMessage};

/// Configuration for the agent runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Model deployment every agent is created with
    pub model: String,

    /// Delay between run status polls
    pub poll_interval: Duration,

    /// Maximum number of polls per run
    pub max_polls: usize,
}

impl RuntimeConfig {
    /// Configuration for a model deployment with default polling
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Executor settings derived from this configuration
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            poll_interval: self.poll_interval,
            max_polls: self.max_polls,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let executor = ExecutorConfig::default();
        Self {
            model: "gpt-4o".to_string(),
            poll_interval: executor.poll_interval,
            max_polls: executor.max_polls,
        }
    }
}

/// Name and instructions of an agent to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentProfile {
    pub name: String,
    pub description: Option<String>,
    pub instructions: String,
}

impl AgentProfile {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            instructions: instructions.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Runtime for creating hosted agents
///
/// # Example
///
/// ```no_run
/// use agent_runtime::{AgentProfile, AgentRuntime, AgentServiceConfig, AzureAgentsClient};
/// use agent_tools::ToolRegistry;
/// use std::sync::Arc;
///
/// # async fn example(tools: Arc<ToolRegistry>) -> anyhow::Result<()> {
/// let client = AzureAgentsClient::with_config(&AgentServiceConfig::from_env()?)?;
/// let runtime = AgentRuntime::builder()
///     .service(Arc::new(client))
///     .tool_registry(tools)
///     .model("gpt-4o")
///     .build()?;
///
/// // Agent that answers tool calls from the runtime's registry
/// let collector = runtime
///     .create_tool_agent(AgentProfile::new("data-collector", "Use your tools."))
///     .await?;
///
/// // Agent without tools
/// let presenter = runtime
///     .create_simple_agent(AgentProfile::new("data-presenter", "Summarize."))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct AgentRuntime {
    service: Arc<dyn AgentService>,
    tool_registry: Arc<ToolRegistry>,
    config: RuntimeConfig,
}

impl AgentRuntime {
    /// Create a new agent runtime
    pub fn new(
        service: Arc<dyn AgentService>,
        tool_registry: Arc<ToolRegistry>,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            service,
            tool_registry,
            config,
        }
    }

    /// Create a new runtime builder
    pub fn builder() -> AgentRuntimeBuilder {
        AgentRuntimeBuilder::new()
    }

    /// Get a reference to the agent service
    pub fn service(&self) -> &Arc<dyn AgentService> {
        &self.service
    }

    /// Get a reference to the default tool registry
    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }

    /// Get a reference to the runtime configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Create an agent that can call every tool of the runtime's registry
    pub async fn create_tool_agent(&self, profile: AgentProfile) -> Result<HostedAgent> {
        self.create_agent_with_tools(profile, Arc::clone(&self.tool_registry))
            .await
    }

    /// Create an agent without tools
    pub async fn create_simple_agent(&self, profile: AgentProfile) -> Result<HostedAgent> {
        self.create_agent_with_tools(profile, Arc::new(ToolRegistry::new()))
            .await
    }

    /// Create an agent whose tools are exactly those of `tools`
    ///
    /// The registry is both advertised to the service and used to answer the
    /// agent's tool calls, so a run can never reach a tool outside it.
    pub async fn create_agent_with_tools(
        &self,
        profile: AgentProfile,
        tools: Arc<ToolRegistry>,
    ) -> Result<HostedAgent> {
        let spec = AgentSpec {
            model: self.config.model.clone(),
            name: profile.name.clone(),
            description: profile.description,
            instructions: profile.instructions,
            tools: tools.definitions(),
        };

        let info = self.service.create_agent(&spec).await?;
        info!(
            agent_id = %info.id,
            agent_name = %profile.name,
            model = %spec.model,
            tools = ?tools.names(),
            "Hosted agent created"
        );

        let executor = RunExecutor::new(
            Arc::clone(&self.service),
            tools,
            self.config.executor_config(),
        );
        Ok(HostedAgent::new(
            info,
            profile.name,
            Arc::clone(&self.service),
            executor,
        ))
    }

    /// Open a new thread and return its ID
    pub async fn create_thread(&self) -> Result<String> {
        let thread = self.service.create_thread().await?;
        info!(thread_id = %thread.id, "Thread created");
        Ok(thread.id)
    }

    /// All messages of a thread, oldest first
    pub async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        Ok(self.service.list_messages(thread_id).await?)
    }
}

/// Builder for AgentRuntime
pub struct AgentRuntimeBuilder {
    service: Option<Arc<dyn AgentService>>,
    tool_registry: Option<Arc<ToolRegistry>>,
    config: RuntimeConfig,
}

impl AgentRuntimeBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            service: None,
            tool_registry: None,
            config: RuntimeConfig::default(),
        }
    }

    /// Set the agent service
    pub fn service(mut self, service: Arc<dyn AgentService>) -> Self {
        self.service = Some(service);
        self
    }

    /// Set the default tool registry
    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = Some(registry);
        self
    }

    /// Set the runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the model deployment
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Build the runtime
    ///
    /// Returns an error if no agent service was set. A missing tool registry
    /// defaults to an empty one.
    pub fn build(self) -> Result<AgentRuntime> {
        let service = self
            .service
            .ok_or_else(|| Error::InitializationFailed("Agent service not set".to_string()))?;

        let tool_registry = self
            .tool_registry
            .unwrap_or_else(|| Arc::new(ToolRegistry::new()));

        Ok(AgentRuntime::new(service, tool_registry, self.config))
    }
}

impl Default for AgentRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
