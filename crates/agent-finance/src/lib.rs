//! Role-gated finance data agents
//!
//! Two hosted agents share one conversation thread: a data collector that
//! answers with finance tools and a data presenter that summarizes. What the
//! collector may touch depends on the user's roles:
//!
//! - [`roles`]: the YAML role store
//! - [`policy`]: roles to query scope, stock quote gate and presentation
//! - [`tools`]: Postgres finance queries, Alpha Vantage quotes, Serper search
//! - [`session`]: runs a [`SessionPlan`] against the agent service
//! - [`transcript`]: renders the resulting conversation
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_finance::{AccessPolicy, FinanceConfig, FinanceSession, FinanceToolbox, RoleStore};
//! use std::sync::Arc;
//!
//! let config = FinanceConfig::from_env()?;
//! let roles = RoleStore::new(&config.roles_path).get_user_roles("user_b")?;
//! let plan = AccessPolicy::for_roles(&roles).session_plan();
//!
//! let toolbox = Arc::new(FinanceToolbox::from_config(&config)?);
//! let report = FinanceSession::new(runtime, toolbox).run(&plan, Some("user_b")).await?;
//! println!("{}", report.transcript.render_summary());
//! ```

pub mod agents;
pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod policy;
pub mod roles;
pub mod session;
pub mod tools;
pub mod transcript;

// Re-export main types
pub use agents::{AgentKind, DataCollectorAgent, DataPresenterAgent};
pub use api::{AlphaVantageClient, GlobalQuote, NewsResult, SerperClient};
pub use config::{FinanceConfig, FinanceConfigBuilder};
pub use db::{FinanceRecord, FinanceStore, LimitedFinanceRecord, NewFinanceRecord, sample_records};
pub use error::{FinanceError, Result};
pub use policy::{AccessPolicy, Presentation, QueryScope, SessionPlan, SessionTask};
pub use roles::{RoleSet, RoleStore, RoleTag, UserRoles};
pub use session::{FinanceSession, SessionReport};
pub use tools::{FinanceQueryTool, FinanceToolbox, NewsSearchTool, StockQuoteTool};
pub use transcript::{Transcript, TranscriptEntry};
