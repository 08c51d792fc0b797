use std::collections::HashMap;
use std::env;

use crate::domain::run::CommitPolicy;
use crate::error::{AppError, AppResult};

pub const JIRA_SERVER_VAR: &str = "JIRA_SERVER";
pub const JIRA_USER_VAR: &str = "JIRA_USER";
pub const JIRA_API_TOKEN_VAR: &str = "JIRA_API_TOKEN";
pub const JIRA_PROJECT_KEY_VAR: &str = "JIRA_PROJECT_KEY";
pub const JIRA_ISSUE_TYPE_VAR: &str = "JIRA_ISSUE_TYPE";
pub const JIRA_TICKET_POLICY_VAR: &str = "JIRA_TICKET_POLICY";
pub const LLM_API_KEY_VAR: &str = "GROQ_API_KEY";
pub const LLM_MODEL_VAR: &str = "GROQ_MODEL";
pub const LLM_BASE_URL_VAR: &str = "GROQ_BASE_URL";

pub const DEFAULT_PROJECT_KEY: &str = "JS";
pub const DEFAULT_ISSUE_TYPE: &str = "Service Request";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Raw settings as found in the environment. Blank values are treated as unset.
#[derive(Debug, Clone, Default)]
pub struct StoredConfig {
    pub jira_server: Option<String>,
    pub jira_user: Option<String>,
    pub jira_api_token: Option<String>,
    pub project_key: Option<String>,
    pub issue_type: Option<String>,
    pub ticket_policy: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_model: Option<String>,
    pub llm_base_url: Option<String>,
}

impl StoredConfig {
    /// Reads the process environment, falling back to a `.env` file in the
    /// working directory or one of its parents. Variables already set win.
    pub fn from_env() -> AppResult<Self> {
        let file_vars = match dotenvy::dotenv_iter() {
            Ok(iter) => read_env_file(iter)?,
            Err(err) if err.not_found() => HashMap::new(),
            Err(err) => {
                return Err(AppError::Configuration(format!(
                    "failed to read .env file: {err}"
                )));
            }
        };
        Ok(Self::from_sources(|name| env::var(name).ok(), &file_vars))
    }

    pub fn from_sources<F>(env_lookup: F, file_vars: &HashMap<String, String>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(|name: &str| env_lookup(name).or_else(|| file_vars.get(name).cloned()))
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            jira_server: get(JIRA_SERVER_VAR),
            jira_user: get(JIRA_USER_VAR),
            jira_api_token: get(JIRA_API_TOKEN_VAR),
            project_key: get(JIRA_PROJECT_KEY_VAR),
            issue_type: get(JIRA_ISSUE_TYPE_VAR),
            ticket_policy: get(JIRA_TICKET_POLICY_VAR),
            llm_api_key: get(LLM_API_KEY_VAR),
            llm_model: get(LLM_MODEL_VAR),
            llm_base_url: get(LLM_BASE_URL_VAR),
        }
    }
}

fn read_env_file<I>(entries: I) -> AppResult<HashMap<String, String>>
where
    I: Iterator<Item = Result<(String, String), dotenvy::Error>>,
{
    entries
        .map(|entry| {
            entry.map_err(|err| {
                AppError::Configuration(format!("invalid .env file: {err}"))
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct JiraSettings {
    pub base_url: String,
    pub user: String,
    pub api_token: String,
    pub project_key: String,
    pub issue_type: String,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl LlmSettings {
    pub fn require_api_key(&self) -> AppResult<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::Configuration(format!("{LLM_API_KEY_VAR} is not set"))
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jira: JiraSettings,
    pub llm: LlmSettings,
    pub ticket_policy: CommitPolicy,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_stored(StoredConfig::from_env()?)
    }

    /// Validates the raw settings, reporting every missing Jira variable at once.
    pub fn from_stored(stored: StoredConfig) -> AppResult<Self> {
        let mut missing = Vec::new();
        if stored.jira_server.is_none() {
            missing.push(JIRA_SERVER_VAR);
        }
        if stored.jira_user.is_none() {
            missing.push(JIRA_USER_VAR);
        }
        if stored.jira_api_token.is_none() {
            missing.push(JIRA_API_TOKEN_VAR);
        }

        let (Some(base_url), Some(user), Some(api_token)) =
            (stored.jira_server, stored.jira_user, stored.jira_api_token)
        else {
            return Err(AppError::Configuration(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        };

        let ticket_policy = stored
            .ticket_policy
            .as_deref()
            .map(str::parse::<CommitPolicy>)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            jira: JiraSettings {
                base_url: base_url.trim_end_matches('/').to_string(),
                user,
                api_token,
                project_key: stored
                    .project_key
                    .unwrap_or_else(|| DEFAULT_PROJECT_KEY.to_string()),
                issue_type: stored
                    .issue_type
                    .unwrap_or_else(|| DEFAULT_ISSUE_TYPE.to_string()),
            },
            llm: LlmSettings {
                api_key: stored.llm_api_key,
                model: stored
                    .llm_model
                    .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
                base_url: stored
                    .llm_base_url
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            },
            ticket_policy,
        })
    }
}
