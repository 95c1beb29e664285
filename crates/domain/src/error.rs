//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`DayPlanError`]
//! via `#[from]`, so callers only ever match on one enum.

use crate::time_block::{DAILY_BUDGET_MINUTES, MAX_BLOCK_MINUTES};

/// Top-level error returned by services and repositories.
#[derive(Debug, thiserror::Error)]
pub enum DayPlanError {
    /// The caller supplied input that breaks a domain rule.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The requested record does not exist or is not owned by the caller.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A persistence collaborator failed.
    #[error("storage error")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// Client-input errors, raised before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("a time block must last at least one minute")]
    ZeroDuration,

    /// A single block is longer than a day.
    #[error(
        "a time block cannot exceed 24 hours ({duration} > {max} minutes)",
        max = MAX_BLOCK_MINUTES
    )]
    DurationExceedsDay { duration: u32 },

    /// Accepting the block would push the user's total past a day.
    #[error(
        "total time of all blocks cannot exceed 24 hours ({booked} booked + {requested} requested > {max} minutes)",
        max = DAILY_BUDGET_MINUTES
    )]
    DailyBudgetExceeded { booked: u32, requested: u32 },

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

/// Lookup miss, scoped by owner where applicable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
