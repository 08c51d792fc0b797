mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::ticket::{self, TicketCommandArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::ticket::IssueOutcome;
use crate::error::AppResult;
use crate::infra::jira::JiraClient;
use crate::infra::llm::ChatCompletionsClient;
use crate::services::LanguageModelService;

#[derive(Parser)]
#[command(
    name = "jira-agent",
    author,
    version,
    about = "Turn a plain-language request into a Jira ticket"
)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Let the agent handle a request. Prompts interactively when no request is given.
    Run(RunArgs),
    /// Create a ticket directly, without the language model.
    Ticket(TicketArgs),
    /// Inspect configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct RunArgs {
    /// e.g. "Create a Jira ticket with summary Login Bug and description Users cannot log in."
    request: Option<String>,
}

#[derive(Args)]
struct TicketArgs {
    #[arg(short, long)]
    summary: String,
    #[arg(short, long, default_value = "")]
    description: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(error) = run(cli.command).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "jira_agent=debug"
    } else {
        "jira_agent=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(command: Commands) -> AppResult<()> {
    match command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Ticket(args) => run_ticket(args).await,
        Commands::Run(args) => run_agent(args).await,
    }
}

async fn run_ticket(args: TicketArgs) -> AppResult<()> {
    let config = AppConfig::load()?;
    let issue_tracker = Arc::new(JiraClient::new(config.jira.clone()));
    let context = AppContext::new(config, issue_tracker, None);

    let outcome = ticket::run(
        &context,
        TicketCommandArgs {
            summary: args.summary,
            description: args.description,
        },
    )
    .await;

    println!("{outcome}");
    if let IssueOutcome::Created { ticket } = &outcome {
        if let Some(url) = &ticket.url {
            println!("View ticket: {url}");
        }
    }
    Ok(())
}

async fn run_agent(args: RunArgs) -> AppResult<()> {
    let config = AppConfig::load()?;
    let api_key = config.llm.require_api_key()?.to_string();

    let language_model: Arc<dyn LanguageModelService> = Arc::new(ChatCompletionsClient::new(
        config.llm.base_url.clone(),
        api_key,
        config.llm.model.clone(),
    ));
    let issue_tracker = Arc::new(JiraClient::new(config.jira.clone()));
    let context = AppContext::new(config, issue_tracker, Some(language_model));

    cmd::run::run(&context, args.request).await
}
