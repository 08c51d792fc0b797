use clap::{Args, Subcommand};

use crate::config::{
    DEFAULT_ISSUE_TYPE, DEFAULT_LLM_BASE_URL, DEFAULT_LLM_MODEL, DEFAULT_PROJECT_KEY,
    StoredConfig,
};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Show the configuration read from the environment and `.env` (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Show => run_show(&StoredConfig::from_env()?),
    }
    Ok(())
}

fn run_show(cfg: &StoredConfig) {
    println!("Jira server: {}", display_value(&cfg.jira_server));
    println!("Jira user: {}", display_value(&cfg.jira_user));
    println!("Jira API token: {}", mask_secret(&cfg.jira_api_token));
    println!(
        "Project key: {}",
        display_or_default(&cfg.project_key, DEFAULT_PROJECT_KEY)
    );
    println!(
        "Issue type: {}",
        display_or_default(&cfg.issue_type, DEFAULT_ISSUE_TYPE)
    );
    println!(
        "Ticket policy: {}",
        display_or_default(&cfg.ticket_policy, "before-attempt")
    );
    println!("Groq API key: {}", mask_secret(&cfg.llm_api_key));
    println!(
        "Groq model: {}",
        display_or_default(&cfg.llm_model, DEFAULT_LLM_MODEL)
    );
    println!(
        "Groq base URL: {}",
        display_or_default(&cfg.llm_base_url, DEFAULT_LLM_BASE_URL)
    );
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn display_or_default(value: &Option<String>, default: &str) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => format!("{default} (default)"),
    }
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars: Vec<char> = token.chars().collect();
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}
