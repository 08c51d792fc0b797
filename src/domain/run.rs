use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::AppError;

/// When a run counts as having used its single ticket creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitPolicy {
    /// Mark the run as used before the request is sent; a failed attempt
    /// still blocks later calls in the same run.
    #[default]
    BeforeAttempt,
    /// Hold the claim while the request is in flight and release it if
    /// the creation fails.
    OnSuccess,
}

impl CommitPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitPolicy::BeforeAttempt => "before-attempt",
            CommitPolicy::OnSuccess => "on-success",
        }
    }
}

impl FromStr for CommitPolicy {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "before-attempt" => Ok(CommitPolicy::BeforeAttempt),
            "on-success" => Ok(CommitPolicy::OnSuccess),
            other => Err(AppError::Configuration(format!(
                "unknown ticket policy '{other}' (expected before-attempt or on-success)"
            ))),
        }
    }
}

/// Per-run creation flag. `Fresh` until the first claim, `Used` afterwards.
#[derive(Debug, Default)]
pub struct RunState {
    ticket_created: AtomicBool,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically moves `Fresh -> Used`. Returns false if the run was already used.
    pub fn try_claim(&self) -> bool {
        self.ticket_created
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn release(&self) {
        self.ticket_created.store(false, Ordering::Release);
    }

    pub fn reset(&self) {
        self.release();
    }

    pub fn is_used(&self) -> bool {
        self.ticket_created.load(Ordering::Acquire)
    }
}
