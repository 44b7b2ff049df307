//! Finance data tools for hosted agents

pub mod finance_query;
pub mod news_search;
pub mod stock_quote;

pub use finance_query::{DEFAULT_COMPANY, FinanceQueryTool, query_output};
pub use news_search::NewsSearchTool;
pub use stock_quote::StockQuoteTool;

use agent_tools::{Tool, ToolRegistry};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::api::{AlphaVantageClient, SerperClient};
use crate::config::FinanceConfig;
use crate::db::FinanceStore;
use crate::error::{FinanceError, Result};
use crate::policy::QueryScope;

pub const QUERY_FINANCE_DATA: &str = "query_finance_data";
pub const QUERY_LIMITED_FINANCE_DATA: &str = "query_limited_finance_data";
pub const QUERY_ROW_LEVEL_FINANCE_DATA: &str = "query_row_level_finance_data";
pub const QUERY_COMPANY_FINANCE_DATA: &str = "query_company_finance_data";
pub const FETCH_STOCK_QUOTE: &str = "fetch_stock_quote";
pub const SEARCH_NEWS: &str = "search_news";

/// Every finance tool, from which per-agent registries are cut
pub struct FinanceToolbox {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl FinanceToolbox {
    /// Build all tools over the given clients
    pub fn new(
        store: Arc<FinanceStore>,
        alpha_vantage: Arc<AlphaVantageClient>,
        serper: Arc<SerperClient>,
        config: &FinanceConfig,
    ) -> Self {
        let mut tools: Vec<Arc<dyn Tool>> = [
            QueryScope::Full,
            QueryScope::Limited,
            QueryScope::RowRestricted,
            QueryScope::Company,
        ]
        .into_iter()
        .map(|scope| Arc::new(FinanceQueryTool::new(Arc::clone(&store), scope)) as Arc<dyn Tool>)
        .collect();
        tools.push(Arc::new(StockQuoteTool::new(alpha_vantage, &config.symbol)));
        tools.push(Arc::new(NewsSearchTool::new(
            serper,
            &config.news_query,
            config.news_limit,
        )));

        Self::from_tools(tools)
    }

    /// Build all tools from configuration; every credential must be present
    pub fn from_config(config: &FinanceConfig) -> Result<Self> {
        let store = FinanceStore::connect_lazy(config.require_database_url()?, config.request_timeout)?;
        let alpha_vantage = AlphaVantageClient::new(
            config.require_alpha_vantage_key()?,
            &config.alpha_vantage_base_url,
            config.alpha_vantage_rate_limit,
            config.request_timeout,
        )?;
        let serper = SerperClient::new(
            config.require_serper_key()?,
            &config.serper_base_url,
            config.request_timeout,
        )?;

        Ok(Self::new(
            Arc::new(store),
            Arc::new(alpha_vantage),
            Arc::new(serper),
            config,
        ))
    }

    /// Toolbox over an arbitrary tool list
    pub fn from_tools(tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        Self {
            tools: tools
                .into_iter()
                .map(|tool| (tool.name().to_string(), tool))
                .collect(),
        }
    }

    pub fn tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// A registry holding exactly the named tools
    pub fn registry_for(&self, names: &[&str]) -> Result<ToolRegistry> {
        let registry = ToolRegistry::new();
        for name in names {
            let tool = self.tool(name).ok_or_else(|| {
                FinanceError::Config(format!("No finance tool named {name}"))
            })?;
            registry.register(tool);
        }
        debug!(tools = ?registry.names(), "Built tool registry");
        Ok(registry)
    }
}
