//! Concrete agent implementations
//!
//! - HostedAgent: an agent registered on the agent service, run on a shared
//!   conversation thread

pub mod hosted;

pub use hosted::HostedAgent;
