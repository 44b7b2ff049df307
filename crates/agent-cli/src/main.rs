//! Command-line interface for the finance agents
//!
//! ```bash
//! finance-agents seed
//! finance-agents roles
//! finance-agents plan user_b
//! finance-agents query company --company IBM
//! finance-agents run --user user_b
//! finance-agents run --basic --keep-agents
//! ```
//!
//! Settings are read from the environment, after loading `.env` when present.

mod commands;

use agent_finance::QueryScope;
use agent_utils::LogFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "finance-agents")]
#[command(version)]
#[command(about = "Role-gated finance data retrieval with hosted agents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log output format (logs go to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Text)]
    log_format: LogFormatArg,

    /// YAML file with the user roles
    #[arg(long, global = true, env = "USER_ROLES_PATH")]
    roles_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Drop, recreate and populate the finance table, then print it
    Seed,

    /// Show the roles of one user, or of every user
    Roles {
        /// User to look up
        username: Option<String>,
    },

    /// Show the access policy and tasks of a user's session
    Plan {
        username: String,
    },

    /// Run one finance query and print its JSON output
    Query {
        #[arg(value_enum)]
        scope: ScopeArg,

        /// Company for the `company` query
        #[arg(long)]
        company: Option<String>,
    },

    /// Run a session with the hosted agents
    Run {
        /// Run the role-gated session for this user
        #[arg(long, required_unless_present = "basic", conflicts_with = "basic")]
        user: Option<String>,

        /// Run the fixed two-step IBM session
        #[arg(long)]
        basic: bool,

        /// Leave the hosted agents in place afterwards
        #[arg(long)]
        keep_agents: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScopeArg {
    Full,
    Limited,
    RowRestricted,
    Company,
}

impl From<ScopeArg> for QueryScope {
    fn from(value: ScopeArg) -> Self {
        match value {
            ScopeArg::Full => QueryScope::Full,
            ScopeArg::Limited => QueryScope::Limited,
            ScopeArg::RowRestricted => QueryScope::RowRestricted,
            ScopeArg::Company => QueryScope::Company,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = agent_utils::load_dotenv();
    let cli = Cli::parse();
    agent_utils::init_tracing(cli.log_format.into());
    if let Some(path) = dotenv {
        debug!(path = %path.display(), "Loaded environment file");
    }

    let mut config = agent_finance::FinanceConfig::from_env()?;
    if let Some(path) = cli.roles_file {
        config = config.with_roles_path(path);
    }

    match cli.command {
        Commands::Seed => commands::seed(&config).await,
        Commands::Roles { username } => commands::roles(&config, username.as_deref()),
        Commands::Plan { username } => commands::plan(&config, &username),
        Commands::Query { scope, company } => {
            commands::query(&config, scope.into(), company.as_deref()).await
        }
        Commands::Run {
            user,
            basic,
            keep_agents,
        } => match user {
            Some(user) if !basic => commands::run_for_user(&config, &user, keep_agents).await,
            _ => commands::run_basic(&config, keep_agents).await,
        },
    }
}
