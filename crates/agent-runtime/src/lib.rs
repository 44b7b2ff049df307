//! Agent runtime for hosted agents
//!
//! The agents in this workspace live on an external agent service. This crate
//! provides the client for that service ([`AgentService`], implemented over
//! REST by [`AzureAgentsClient`]), the [`RunExecutor`] that drives a run to
//! completion while answering its tool calls from a local
//! [`ToolRegistry`](agent_tools::ToolRegistry), and the [`AgentRuntime`]
//! factory that registers hosted agents and wraps them as
//! [`Agent`](agent_core::Agent) implementations.

pub mod agents;
pub mod azure;
pub mod error;
pub mod executor;
pub mod runtime;
pub mod service;
pub mod types;

// Re-export key types
pub use agents::HostedAgent;
pub use azure::{AgentServiceConfig, AzureAgentsClient};
pub use error::{Result, ServiceError};
pub use executor::{ExecutorConfig, RunExecutor};
pub use runtime::{AgentProfile, AgentRuntime, AgentRuntimeBuilder, RuntimeConfig};
pub use service::AgentService;
pub use types::{
    AgentSpec, HostedAgentInfo, MessageContent, MessageRole, Run, RunStatus, Thread,
    ThreadMessage, ToolCall, ToolOutput,
};
