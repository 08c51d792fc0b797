use async_trait::async_trait;
use tracing::warn;

use crate::domain::ticket::{IssueOutcome, Ticket, TicketDraft};
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn create_ticket(&self, draft: TicketDraft) -> AppResult<Ticket>;

    /// Creates the ticket and folds every failure into `IssueOutcome::Failed`.
    async fn submit(&self, draft: TicketDraft) -> IssueOutcome {
        match self.create_ticket(draft).await {
            Ok(ticket) => IssueOutcome::Created { ticket },
            Err(err) => {
                warn!(error = %err, "ticket creation failed");
                IssueOutcome::Failed {
                    message: err.to_string(),
                }
            }
        }
    }
}
