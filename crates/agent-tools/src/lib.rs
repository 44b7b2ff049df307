//! Tool management and dispatch for the finance agents
//!
//! Tools are the functions a hosted agent may ask us to run. This crate
//! defines the [`Tool`] trait, the [`ToolRegistry`] that holds a session's
//! tools, and the [`ToolDefinition`] sent to the agent service when an agent
//! is created.

pub mod definition;
pub mod registry;
pub mod tool;

pub use definition::{ToolDefinition, schema};
pub use registry::ToolRegistry;
pub use tool::Tool;
