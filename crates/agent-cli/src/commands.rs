//! Subcommand handlers

use agent_finance::{
    AccessPolicy, AgentKind, FinanceConfig, FinanceQueryTool, FinanceRecord, FinanceSession, FinanceStore,
    FinanceToolbox, Presentation, QueryScope, RoleSet, RoleStore, SessionPlan, SessionReport, UserRoles,
    sample_records,
};
use agent_runtime::{AgentRuntime, AgentServiceConfig, AzureAgentsClient};
use agent_workflow::StepOutput;
use agent_tools::Tool;
use serde_json::{Value, json};
use std::fmt::Write;
use std::sync::Arc;
use tracing::info;

/// Deployment the hosted agents run on
const MODEL_ENV: &str = "AZURE_OPENAI_DEPLOYMENT_NAME";

pub async fn seed(config: &FinanceConfig) -> anyhow::Result<()> {
    let store = database(config)?;
    let inserted = store.seed(&sample_records()).await?;
    info!(rows = inserted, "Finance table seeded");

    for record in store.fetch_all().await? {
        println!("{}", format_record(&record));
    }
    println!("✅ Finance table is set up with {inserted} records!");
    Ok(())
}

pub fn roles(config: &FinanceConfig, username: Option<&str>) -> anyhow::Result<()> {
    let store = RoleStore::new(&config.roles_path);
    let users = match username {
        Some(username) => vec![UserRoles {
            username: username.to_string(),
            roles: store.get_user_roles(username)?,
        }],
        None => store.users()?,
    };

    for user in &users {
        println!("{}: {}", user.username, user.roles);
    }
    Ok(())
}

pub fn plan(config: &FinanceConfig, username: &str) -> anyhow::Result<()> {
    let roles = RoleStore::new(&config.roles_path).get_user_roles(username)?;
    let policy = AccessPolicy::for_roles(&roles);
    print!(
        "{}",
        format_plan(username, &roles, &policy, &policy.session_plan())
    );
    Ok(())
}

pub async fn query(
    config: &FinanceConfig,
    scope: QueryScope,
    company: Option<&str>,
) -> anyhow::Result<()> {
    let tool = FinanceQueryTool::new(Arc::new(database(config)?), scope);
    let params = company.map_or(Value::Null, |company| json!({ "company": company }));

    let output = tool.execute(params).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub async fn run_for_user(
    config: &FinanceConfig,
    username: &str,
    keep_agents: bool,
) -> anyhow::Result<()> {
    let roles = RoleStore::new(&config.roles_path).get_user_roles(username)?;
    let policy = AccessPolicy::for_roles(&roles);
    info!(
        user = username,
        roles = %roles,
        scope = %policy.scope,
        stock_quotes = policy.stock_quotes,
        "Configuring tasks based on user roles"
    );

    let plan = policy.session_plan();
    let report = session(config, keep_agents)?
        .run(&plan, Some(username))
        .await?;
    print_agents(&report);
    print!("{}", format_run_statuses(&plan, &report.steps));
    println!();
    print!("{}", report.transcript.render_summary());
    Ok(())
}

pub async fn run_basic(config: &FinanceConfig, keep_agents: bool) -> anyhow::Result<()> {
    let plan = SessionPlan::basic();
    let report = session(config, keep_agents)?.run(&plan, None).await?;
    print_agents(&report);
    print!("{}", format_run_statuses(&plan, &report.steps));
    println!();
    print!("{}", report.transcript.render_detailed());
    Ok(())
}

fn database(config: &FinanceConfig) -> anyhow::Result<FinanceStore> {
    Ok(FinanceStore::connect_lazy(
        config.require_database_url()?,
        config.request_timeout,
    )?)
}

fn session(config: &FinanceConfig, keep_agents: bool) -> anyhow::Result<FinanceSession> {
    let toolbox = FinanceToolbox::from_config(config)?;

    let service_config = AgentServiceConfig::from_env()?;
    let client = AzureAgentsClient::with_config(&service_config)?;
    let runtime = AgentRuntime::builder()
        .service(Arc::new(client))
        .model(agent_utils::required_env(MODEL_ENV)?)
        .build()?;

    Ok(FinanceSession::new(Arc::new(runtime), Arc::new(toolbox)).with_keep_agents(keep_agents))
}

fn print_agents(report: &SessionReport) {
    println!(
        "✅ Agents created:\n- Collector ID: {}\n- Presenter ID: {}",
        report.collector_id, report.presenter_id
    );
}

/// One status line per finished step, labelled by the agent that ran it
fn format_run_statuses(plan: &SessionPlan, steps: &[StepOutput]) -> String {
    let mut out = String::new();
    for (task, step) in plan.tasks.iter().zip(steps) {
        let heading = match task.agent {
            AgentKind::Collector => "📥 Data Collector",
            AgentKind::Presenter => "📝 Data Presenter",
        };
        let _ = writeln!(
            out,
            "{heading} Run Status: {}",
            step.run_status.as_deref().unwrap_or("unknown")
        );
    }
    out
}

fn format_record(record: &FinanceRecord) -> String {
    format!(
        "{:>3}  {:<10} revenue={:<10} profit={:<10} stock_price={:<8} {}",
        record.id,
        record.company,
        record.revenue,
        record.profit,
        record.stock_price,
        record.user_role
    )
}

fn format_plan(username: &str, roles: &RoleSet, policy: &AccessPolicy, plan: &SessionPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "User: {username}");
    let _ = writeln!(out, "Roles: {roles}");
    let _ = writeln!(out, "Query scope: {}", policy.scope);
    let _ = writeln!(
        out,
        "Stock quotes: {}",
        if policy.stock_quotes { "allowed" } else { "denied" }
    );
    let _ = writeln!(
        out,
        "Presentation: {}",
        match policy.presentation {
            Presentation::Full => "full",
            Presentation::Masked => "masked",
        }
    );
    let _ = writeln!(out, "Collector tools: {}", plan.collector_tools.join(", "));
    let _ = writeln!(out, "Tasks:");
    for (index, task) in plan.tasks.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. [{}] {}",
            index + 1,
            task.agent.as_str(),
            task.instruction
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_finance::RoleTag;

    #[test]
    fn test_format_plan_for_masked_limited_user() {
        let roles: RoleSet = [RoleTag::RestrictedDb, RoleTag::MaskData].into_iter().collect();
        let policy = AccessPolicy::for_roles(&roles);
        let text = format_plan("user_b", &roles, &policy, &policy.session_plan());

        assert!(text.contains("Roles: restricted_db, mask_data\n"));
        assert!(text.contains("Query scope: limited\n"));
        assert!(text.contains("Stock quotes: allowed\n"));
        assert!(text.contains("Presentation: masked\n"));
        assert!(text.contains("  2. [collector] Query limited finance data from the Neon database.\n"));
        assert!(text.contains("  4. [presenter] Summarize the financial data but mask revenue and profit.\n"));
    }

    #[test]
    fn test_format_plan_without_quotes() {
        let roles: RoleSet = [RoleTag::LimitedApiAccess].into_iter().collect();
        let policy = AccessPolicy::for_roles(&roles);
        let text = format_plan("user_d", &roles, &policy, &policy.session_plan());

        assert!(text.contains("Stock quotes: denied\n"));
        assert!(!text.contains("fetch_stock_quote"));
        assert!(text.contains("  3. [presenter]"));
    }

    #[test]
    fn test_run_statuses_follow_plan_agents() {
        let plan = SessionPlan::basic();
        let step = |label: &str, status: Option<&str>| StepOutput {
            label: label.to_string(),
            agent: "agent".to_string(),
            instruction: String::new(),
            reply: String::new(),
            run_status: status.map(str::to_string),
        };
        let text = format_run_statuses(
            &plan,
            &[step("collect", Some("completed")), step("present", None)],
        );
        assert_eq!(
            text,
            "📥 Data Collector Run Status: completed\n📝 Data Presenter Run Status: unknown\n"
        );
    }

    #[test]
    fn test_format_record() {
        let record = FinanceRecord {
            id: 1,
            company: "IBM".to_string(),
            revenue: 60_000.0,
            profit: 12_000.0,
            stock_price: 145.3,
            user_role: "restricted".to_string(),
        };
        let line = format_record(&record);
        assert!(line.starts_with("  1  IBM"));
        assert!(line.contains("stock_price=145.3"));
        assert!(line.ends_with("restricted"));
    }
}
