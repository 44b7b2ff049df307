//! Shared utilities for the finance agents
//!
//! This crate provides common functionality used across the workspace,
//! including logging setup, environment-driven configuration helpers and
//! secret masking.

pub mod config;
pub mod logging;

pub use config::{ConfigError, load_dotenv, mask_secret, optional_env, parse_env, required_env};
pub use logging::{LogFormat, init_tracing};
