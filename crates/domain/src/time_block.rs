//! Time block — a user-owned duration with a display position.
//!
//! A user's blocks share a single day: no block may be longer than
//! [`MAX_BLOCK_MINUTES`] and the blocks of one user may not add up to more
//! than [`DAILY_BUDGET_MINUTES`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DayPlanError, ValidationError};
use crate::id::{TimeBlockId, UserId};

/// UTC timestamp used for `created_at` and `updated_at`.
pub type Timestamp = DateTime<Utc>;

/// Longest a single block may last, in minutes.
pub const MAX_BLOCK_MINUTES: u32 = 24 * 60;

/// Ceiling on the combined duration of all blocks of one user, in minutes.
pub const DAILY_BUDGET_MINUTES: u32 = 24 * 60;

/// Position given to a block created without an explicit order.
pub const DEFAULT_ORDER: i64 = 1;

/// A persisted time block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub id: TimeBlockId,
    pub user_id: UserId,
    pub name: String,
    pub color: Option<String>,
    /// Length in minutes.
    pub duration: u32,
    pub order: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TimeBlock {
    /// Materialize a draft into a block owned by `user_id`.
    ///
    /// The draft is taken as-is; call [`NewTimeBlock::validate`] first.
    #[must_use]
    pub fn new(draft: NewTimeBlock, user_id: UserId, at: Timestamp) -> Self {
        Self {
            id: TimeBlockId::new(),
            user_id,
            name: draft.name,
            color: draft.color,
            duration: draft.duration,
            order: draft.order.unwrap_or(DEFAULT_ORDER),
            created_at: at,
            updated_at: at,
        }
    }

    /// Apply every field present in `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: TimeBlockPatch, at: Timestamp) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(color) = patch.color {
            self.color = Some(color);
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        self.updated_at = at;
    }
}

/// Payload for creating a time block. Ownership is supplied separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTimeBlock {
    pub name: String,
    pub color: Option<String>,
    pub duration: u32,
    pub order: Option<i64>,
}

impl NewTimeBlock {
    /// Create a builder for constructing a [`NewTimeBlock`].
    #[must_use]
    pub fn builder() -> NewTimeBlockBuilder {
        NewTimeBlockBuilder::default()
    }

    /// Check the per-block invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DayPlanError::Validation`] when `name` is empty or `duration`
    /// falls outside `1..=MAX_BLOCK_MINUTES`.
    pub fn validate(&self) -> Result<(), DayPlanError> {
        validate_name(&self.name)?;
        validate_duration(self.duration)?;
        Ok(())
    }
}

/// Step-by-step builder for [`NewTimeBlock`].
#[derive(Debug, Default)]
pub struct NewTimeBlockBuilder {
    name: Option<String>,
    color: Option<String>,
    duration: Option<u32>,
    order: Option<i64>,
}

impl NewTimeBlockBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }

    #[must_use]
    pub fn order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// Consume the builder, validate, and return a [`NewTimeBlock`].
    ///
    /// # Errors
    ///
    /// Returns [`DayPlanError::Validation`] if `name` is missing or empty, or
    /// if `duration` is missing or out of range.
    pub fn build(self) -> Result<NewTimeBlock, DayPlanError> {
        let draft = NewTimeBlock {
            name: self.name.unwrap_or_default(),
            color: self.color,
            duration: self.duration.unwrap_or_default(),
            order: self.order,
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// Partial update: `None` leaves the corresponding field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeBlockPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub duration: Option<u32>,
    pub order: Option<i64>,
}

impl TimeBlockPatch {
    /// Check the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns [`DayPlanError::Validation`] for an empty `name` or an
    /// out-of-range `duration`.
    pub fn validate(&self) -> Result<(), DayPlanError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(duration) = self.duration {
            validate_duration(duration)?;
        }
        Ok(())
    }
}

/// Sum the durations of `blocks`, saturating at `u32::MAX`.
#[must_use]
pub fn total_minutes<'a>(blocks: impl IntoIterator<Item = &'a TimeBlock>) -> u32 {
    blocks
        .into_iter()
        .fold(0u32, |acc, block| acc.saturating_add(block.duration))
}

/// Check that `requested` more minutes fit next to `booked` ones.
///
/// # Errors
///
/// Returns [`ValidationError::DailyBudgetExceeded`] when the sum passes
/// [`DAILY_BUDGET_MINUTES`].
pub fn ensure_within_budget(booked: u32, requested: u32) -> Result<(), ValidationError> {
    if booked.saturating_add(requested) > DAILY_BUDGET_MINUTES {
        return Err(ValidationError::DailyBudgetExceeded { booked, requested });
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

fn validate_duration(duration: u32) -> Result<(), ValidationError> {
    if duration == 0 {
        return Err(ValidationError::ZeroDuration);
    }
    if duration > MAX_BLOCK_MINUTES {
        return Err(ValidationError::DurationExceedsDay { duration });
    }
    Ok(())
}
