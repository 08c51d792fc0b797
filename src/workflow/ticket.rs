use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::domain::argument::ToolArgument;
use crate::domain::chat::ToolDefinition;
use crate::domain::run::{CommitPolicy, RunState};
use crate::domain::ticket::{IssueOutcome, SkipReason, TicketDraft};
use crate::services::IssueTrackerService;

pub const CREATE_TICKET_TOOL: &str = "CreateJiraTicket";

/// Ticket creation limited to one call per run. Call `reset` at each run boundary.
pub struct GuardedTicketTool {
    tracker: Arc<dyn IssueTrackerService>,
    policy: CommitPolicy,
    state: RunState,
}

impl GuardedTicketTool {
    pub fn new(tracker: Arc<dyn IssueTrackerService>, policy: CommitPolicy) -> Self {
        Self {
            tracker,
            policy,
            state: RunState::new(),
        }
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition {
            name: CREATE_TICKET_TOOL,
            description: "Create a new Jira ticket with summary and description. \
                          Only one ticket will be created per run.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "summary": {"type": "string", "description": "Short ticket title"},
                    "description": {"type": "string", "description": "Ticket details"}
                },
                "required": ["summary", "description"]
            }),
        }
    }

    pub async fn create(&self, summary: ToolArgument, description: ToolArgument) -> IssueOutcome {
        let draft = TicketDraft::new(summary.normalize(), description.normalize());

        if !self.state.try_claim() {
            warn!(summary = %draft.summary, "ticket already created in this run, skipping");
            return IssueOutcome::Skipped {
                reason: SkipReason::Duplicate,
            };
        }

        info!(summary = %draft.summary, policy = self.policy.as_str(), "creating ticket");
        let outcome = self.tracker.submit(draft).await;

        if self.policy == CommitPolicy::OnSuccess && !outcome.is_created() {
            self.state.release();
        }
        outcome
    }

    /// Returns the run to `Fresh`.
    pub fn reset(&self) {
        self.state.reset();
    }

    pub fn is_used(&self) -> bool {
        self.state.is_used()
    }
}
