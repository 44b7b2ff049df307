//! Multi-agent orchestration for the finance agents
//!
//! A [`Workflow`] is an ordered list of steps, each sending one instruction
//! to one agent on a shared [`Context`](agent_core::Context).

pub mod workflow;

// Re-export for convenience
pub use workflow::{StepOutput, Workflow, WorkflowBuilder, WorkflowStep};
