use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::services::{IssueTrackerService, LanguageModelService};
use crate::workflow::agent::Agent;
use crate::workflow::ticket::GuardedTicketTool;

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub language_model: Option<Arc<dyn LanguageModelService>>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        issue_tracker: Arc<dyn IssueTrackerService>,
        language_model: Option<Arc<dyn LanguageModelService>>,
    ) -> Self {
        Self {
            config,
            issue_tracker,
            language_model,
        }
    }

    /// Guarded creation tool with fresh run state.
    pub fn new_ticket_tool(&self) -> GuardedTicketTool {
        GuardedTicketTool::new(self.issue_tracker.clone(), self.config.ticket_policy)
    }

    /// Agent for a session; every request it handles is a separate run.
    pub fn new_agent(&self) -> AppResult<Agent> {
        let language_model = self.language_model.clone().ok_or_else(|| {
            AppError::Configuration("language model is not configured".to_string())
        })?;
        Ok(Agent::new(language_model, self.new_ticket_tool()))
    }
}
