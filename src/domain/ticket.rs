use std::fmt;

/// Summary and description handed to the issue tracker for one creation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    pub summary: String,
    pub description: String,
}

impl TicketDraft {
    pub fn new(summary: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub key: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Duplicate,
}

/// Result of a creation attempt as seen by the agent and the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome {
    Created { ticket: Ticket },
    Skipped { reason: SkipReason },
    Failed { message: String },
}

impl IssueOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, IssueOutcome::Created { .. })
    }

    pub fn issue_key(&self) -> Option<&str> {
        match self {
            IssueOutcome::Created { ticket } => Some(&ticket.key),
            _ => None,
        }
    }
}

impl fmt::Display for IssueOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueOutcome::Created { ticket } => {
                write!(f, "✅ Jira ticket created successfully: {}", ticket.key)
            }
            IssueOutcome::Skipped {
                reason: SkipReason::Duplicate,
            } => write!(f, "⚠️ Ticket already created in this run. Skipping duplicate."),
            IssueOutcome::Failed { message } => {
                write!(f, "❌ Error creating Jira ticket: {message}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_created_with_key() {
        let outcome = IssueOutcome::Created {
            ticket: Ticket {
                key: "JS-42".to_string(),
                url: None,
            },
        };
        assert_eq!(
            outcome.to_string(),
            "✅ Jira ticket created successfully: JS-42"
        );
        assert_eq!(outcome.issue_key(), Some("JS-42"));
    }

    #[test]
    fn renders_duplicate_warning() {
        let outcome = IssueOutcome::Skipped {
            reason: SkipReason::Duplicate,
        };
        assert!(outcome.to_string().contains("already created"));
        assert!(!outcome.is_created());
    }

    #[test]
    fn renders_failure_message() {
        let outcome = IssueOutcome::Failed {
            message: "network error: connection refused".to_string(),
        };
        assert_eq!(
            outcome.to_string(),
            "❌ Error creating Jira ticket: network error: connection refused"
        );
    }
}
