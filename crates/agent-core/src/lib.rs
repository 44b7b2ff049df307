//! Core abstractions for the finance agents workspace
//!
//! This crate defines the `Agent` trait, the per-session `Context` and the
//! shared error type used by the tool, runtime and workflow crates.

pub mod agent;
pub mod context;
pub mod error;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, Result};
