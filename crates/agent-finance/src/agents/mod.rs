//! The two hosted agents of a finance session

pub mod data_collector;
pub mod data_presenter;

pub use data_collector::DataCollectorAgent;
pub use data_presenter::DataPresenterAgent;

use chrono::{DateTime, Local};
use serde::Serialize;

/// Instructions of the collector in the basic session
pub const COLLECTOR_INSTRUCTIONS: &str = "You are an AI researcher focused on collecting financial data. Use your tools to:
- Query Neon Postgres database
- Fetch IBM stock data from Alpha Vantage";

/// Instructions of the presenter in the basic session
pub const PRESENTER_INSTRUCTIONS: &str = "You are a summarization assistant. Your task is to format and present financial data insights in a concise, readable way.";

/// Instructions of the collector in a role-gated session
pub const GATED_COLLECTOR_INSTRUCTIONS: &str =
    "Use your tools to collect financial and stock data related to IBM.";

/// Instructions of the presenter in a role-gated session
pub const GATED_PRESENTER_INSTRUCTIONS: &str =
    "Summarize the financial data collected earlier into a nice report.";

/// Which of the two agents a task is sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Collector,
    Presenter,
}

impl AgentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Collector => "collector",
            AgentKind::Presenter => "presenter",
        }
    }

    fn name_prefix(self) -> &'static str {
        match self {
            AgentKind::Collector => "data-collector-agent",
            AgentKind::Presenter => "data-presenter-agent",
        }
    }

    /// Agent name, unique to the minute it was created in
    pub fn agent_name(self, created: DateTime<Local>) -> String {
        format!("{}-{}", self.name_prefix(), created.format("%Y%m%d%H%M"))
    }
}
