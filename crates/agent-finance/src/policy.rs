//! Access policy derived from a user's roles
//!
//! The policy decides three things: which finance query tool the collector
//! gets, whether the collector may fetch stock quotes, and how the presenter
//! is asked to summarize. Everything here is pure.

use crate::agents::{
    AgentKind, COLLECTOR_INSTRUCTIONS, GATED_COLLECTOR_INSTRUCTIONS, GATED_PRESENTER_INSTRUCTIONS,
    PRESENTER_INSTRUCTIONS,
};
use crate::roles::{RoleSet, RoleTag};
use crate::tools::{
    FETCH_STOCK_QUOTE, QUERY_COMPANY_FINANCE_DATA, QUERY_FINANCE_DATA, QUERY_LIMITED_FINANCE_DATA,
    QUERY_ROW_LEVEL_FINANCE_DATA, SEARCH_NEWS,
};
use serde::Serialize;
use std::fmt;

/// How much of the finance table a query returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryScope {
    /// Every column of every row
    Full,
    /// Company and stock price of every row
    Limited,
    /// Every column of rows classified `restricted`
    RowRestricted,
    /// Every column of one company's rows
    Company,
}

impl QueryScope {
    /// Name of the tool that runs this query
    pub fn tool_name(self) -> &'static str {
        match self {
            QueryScope::Full => QUERY_FINANCE_DATA,
            QueryScope::Limited => QUERY_LIMITED_FINANCE_DATA,
            QueryScope::RowRestricted => QUERY_ROW_LEVEL_FINANCE_DATA,
            QueryScope::Company => QUERY_COMPANY_FINANCE_DATA,
        }
    }

    /// Task phrase used in the collector's database instruction
    pub fn task(self) -> &'static str {
        match self {
            QueryScope::Full => "Query full finance data",
            QueryScope::Limited => "Query limited finance data",
            QueryScope::RowRestricted => "Query row level restricted finance data",
            QueryScope::Company => "Query company finance data",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QueryScope::Full => "full",
            QueryScope::Limited => "limited",
            QueryScope::RowRestricted => "row_restricted",
            QueryScope::Company => "company",
        }
    }
}

impl fmt::Display for QueryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the presenter is asked to summarize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presentation {
    Full,
    Masked,
}

impl Presentation {
    pub fn instruction(self) -> &'static str {
        match self {
            Presentation::Full => "Summarize the collected financial data into a clean report.",
            Presentation::Masked => "Summarize the financial data but mask revenue and profit.",
        }
    }
}

/// What a user may see and do in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessPolicy {
    pub scope: QueryScope,
    pub stock_quotes: bool,
    pub presentation: Presentation,
}

impl AccessPolicy {
    /// Derive the policy; when several query restrictions apply the most
    /// restrictive one wins (`restricted_db` over `row_restricted`)
    pub fn for_roles(roles: &RoleSet) -> Self {
        let scope = if roles.contains(RoleTag::RestrictedDb) {
            QueryScope::Limited
        } else if roles.contains(RoleTag::RowRestricted) {
            QueryScope::RowRestricted
        } else {
            QueryScope::Full
        };

        let presentation = if roles.contains(RoleTag::MaskData) {
            Presentation::Masked
        } else {
            Presentation::Full
        };

        Self {
            scope,
            stock_quotes: !roles.contains(RoleTag::LimitedApiAccess),
            presentation,
        }
    }

    /// Tools registered on the collector
    pub fn collector_tools(&self) -> Vec<&'static str> {
        let mut tools = vec![SEARCH_NEWS, self.scope.tool_name()];
        if self.stock_quotes {
            tools.push(FETCH_STOCK_QUOTE);
        }
        tools
    }

    /// The ordered tasks of a role-gated session
    pub fn session_plan(&self) -> SessionPlan {
        let mut tasks = vec![
            SessionTask::collector(
                "search",
                "Search for IBM's Q4 financial results from the web.",
            ),
            SessionTask::collector("query", format!("{} from the Neon database.", self.scope.task())),
        ];
        if self.stock_quotes {
            tasks.push(SessionTask::collector(
                "quote",
                "Fetch IBM's latest stock data from Alpha Vantage.",
            ));
        }
        tasks.push(SessionTask::presenter(
            "present",
            self.presentation.instruction(),
        ));

        SessionPlan {
            collector_instructions: GATED_COLLECTOR_INSTRUCTIONS.to_string(),
            presenter_instructions: GATED_PRESENTER_INSTRUCTIONS.to_string(),
            collector_tools: self.collector_tools(),
            tasks,
        }
    }
}

/// One instruction sent to one of the two agents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionTask {
    pub agent: AgentKind,
    pub label: &'static str,
    pub instruction: String,
}

impl SessionTask {
    pub fn collector(label: &'static str, instruction: impl Into<String>) -> Self {
        Self {
            agent: AgentKind::Collector,
            label,
            instruction: instruction.into(),
        }
    }

    pub fn presenter(label: &'static str, instruction: impl Into<String>) -> Self {
        Self {
            agent: AgentKind::Presenter,
            label,
            instruction: instruction.into(),
        }
    }
}

/// Everything a session needs before any service is contacted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionPlan {
    pub collector_instructions: String,
    pub presenter_instructions: String,
    pub collector_tools: Vec<&'static str>,
    pub tasks: Vec<SessionTask>,
}

impl SessionPlan {
    /// The fixed two-step IBM session
    pub fn basic() -> Self {
        Self {
            collector_instructions: COLLECTOR_INSTRUCTIONS.to_string(),
            presenter_instructions: PRESENTER_INSTRUCTIONS.to_string(),
            collector_tools: vec![SEARCH_NEWS, QUERY_COMPANY_FINANCE_DATA, FETCH_STOCK_QUOTE],
            tasks: vec![
                SessionTask::collector(
                    "collect",
                    "Collect IBM financial records and latest stock data.",
                ),
                SessionTask::presenter(
                    "present",
                    "Summarize the financial data collected earlier.",
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(tags: &[RoleTag]) -> RoleSet {
        tags.iter().copied().collect()
    }

    fn instructions(plan: &SessionPlan) -> Vec<&str> {
        plan.tasks.iter().map(|t| t.instruction.as_str()).collect()
    }

    #[test]
    fn test_no_roles_gets_full_access() {
        let policy = AccessPolicy::for_roles(&RoleSet::new());
        assert_eq!(policy.scope, QueryScope::Full);
        assert!(policy.stock_quotes);
        assert_eq!(policy.presentation, Presentation::Full);

        let plan = policy.session_plan();
        assert_eq!(
            instructions(&plan),
            vec![
                "Search for IBM's Q4 financial results from the web.",
                "Query full finance data from the Neon database.",
                "Fetch IBM's latest stock data from Alpha Vantage.",
                "Summarize the collected financial data into a clean report.",
            ]
        );
        assert_eq!(
            plan.collector_tools,
            vec![SEARCH_NEWS, QUERY_FINANCE_DATA, FETCH_STOCK_QUOTE]
        );
    }

    #[test]
    fn test_restricted_db_with_masking() {
        let policy = AccessPolicy::for_roles(&roles(&[RoleTag::RestrictedDb, RoleTag::MaskData]));
        let plan = policy.session_plan();

        assert_eq!(
            plan.tasks[1].instruction,
            "Query limited finance data from the Neon database."
        );
        assert_eq!(
            plan.tasks.last().unwrap().instruction,
            "Summarize the financial data but mask revenue and profit."
        );
        assert_eq!(plan.tasks.last().unwrap().agent, AgentKind::Presenter);
        assert!(plan.collector_tools.contains(&QUERY_LIMITED_FINANCE_DATA));
        assert!(!plan.collector_tools.contains(&QUERY_FINANCE_DATA));
        assert!(!plan.collector_tools.contains(&QUERY_ROW_LEVEL_FINANCE_DATA));
    }

    #[test]
    fn test_row_restricted() {
        let policy = AccessPolicy::for_roles(&roles(&[RoleTag::RowRestricted]));
        assert_eq!(policy.scope, QueryScope::RowRestricted);
        assert_eq!(
            policy.session_plan().tasks[1].instruction,
            "Query row level restricted finance data from the Neon database."
        );
    }

    #[test]
    fn test_most_restrictive_scope_wins() {
        let policy =
            AccessPolicy::for_roles(&roles(&[RoleTag::RowRestricted, RoleTag::RestrictedDb]));
        assert_eq!(policy.scope, QueryScope::Limited);
    }

    #[test]
    fn test_limited_api_access_drops_quote_task() {
        let policy = AccessPolicy::for_roles(&roles(&[RoleTag::LimitedApiAccess]));
        let plan = policy.session_plan();

        assert_eq!(plan.tasks.len(), 3);
        assert!(
            plan.tasks
                .iter()
                .all(|t| !t.instruction.contains("Alpha Vantage"))
        );
        assert!(!plan.collector_tools.contains(&FETCH_STOCK_QUOTE));
    }

    #[test]
    fn test_presenter_runs_last_and_only_once() {
        for tags in [
            vec![],
            vec![RoleTag::RestrictedDb],
            vec![RoleTag::LimitedApiAccess, RoleTag::MaskData],
        ] {
            let plan = AccessPolicy::for_roles(&roles(&tags)).session_plan();
            let presenters: Vec<_> = plan
                .tasks
                .iter()
                .enumerate()
                .filter(|(_, t)| t.agent == AgentKind::Presenter)
                .map(|(i, _)| i)
                .collect();
            assert_eq!(presenters, vec![plan.tasks.len() - 1]);
        }
    }

    #[test]
    fn test_basic_plan() {
        let plan = SessionPlan::basic();
        assert_eq!(plan.tasks.len(), 2);
        assert_eq!(plan.tasks[0].agent, AgentKind::Collector);
        assert_eq!(
            plan.collector_tools,
            vec![SEARCH_NEWS, QUERY_COMPANY_FINANCE_DATA, FETCH_STOCK_QUOTE]
        );
    }
}
