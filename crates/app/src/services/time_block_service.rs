//! Time block service — use-cases for a user's time blocks.

use chrono::Utc;

use dayplan_domain::error::{DayPlanError, NotFoundError};
use dayplan_domain::id::{TimeBlockId, UserId};
use dayplan_domain::time_block::{
    NewTimeBlock, TimeBlock, TimeBlockPatch, ensure_within_budget, total_minutes,
};

use crate::ports::TimeBlockRepository;

/// Application service for time block CRUD and reordering.
pub struct TimeBlockService<R> {
    repo: R,
}

impl<R: TimeBlockRepository> TimeBlockService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// List the blocks owned by `user_id`, ascending by `order`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_time_blocks(&self, user_id: UserId) -> Result<Vec<TimeBlock>, DayPlanError> {
        self.repo.find_by_user(user_id).await
    }

    /// Create a block for `user_id` once it passes the per-block limit and
    /// fits in what is left of the user's day.
    ///
    /// # Errors
    ///
    /// Returns [`DayPlanError::Validation`] if the block is longer than a day
    /// or would push the user's total past a day, or a storage error
    /// propagated from the repository. Nothing is written on error.
    #[tracing::instrument(skip(self, draft), fields(duration = draft.duration))]
    pub async fn create_time_block(
        &self,
        draft: NewTimeBlock,
        user_id: UserId,
    ) -> Result<TimeBlock, DayPlanError> {
        draft.validate()?;

        let existing = self.repo.find_by_user(user_id).await?;
        ensure_within_budget(total_minutes(&existing), draft.duration)?;

        self.repo
            .create(TimeBlock::new(draft, user_id, Utc::now()))
            .await
    }

    /// Apply `patch` to the block `id` owned by `user_id`.
    ///
    /// Ownership is resolved before the patch is looked at. A patch that
    /// makes the block longer is checked against the rest of the user's day.
    ///
    /// # Errors
    ///
    /// Returns [`DayPlanError::NotFound`] when `id` does not exist or belongs
    /// to another user, [`DayPlanError::Validation`] if the patched block
    /// breaks a limit, or a storage error from the repository.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_time_block(
        &self,
        patch: TimeBlockPatch,
        id: TimeBlockId,
        user_id: UserId,
    ) -> Result<TimeBlock, DayPlanError> {
        let mut block = self
            .repo
            .get_by_id(id, user_id)
            .await?
            .ok_or_else(|| not_found(id))?;

        patch.validate()?;

        if let Some(duration) = patch.duration.filter(|d| *d > block.duration) {
            let blocks = self.repo.find_by_user(user_id).await?;
            let booked = total_minutes(blocks.iter().filter(|other| other.id != id));
            ensure_within_budget(booked, duration)?;
        }

        block.apply(patch, Utc::now());
        self.repo
            .update(block)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Delete the block `id` owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DayPlanError::NotFound`] when `id` does not exist or belongs
    /// to another user, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_time_block(
        &self,
        id: TimeBlockId,
        user_id: UserId,
    ) -> Result<(), DayPlanError> {
        if self.repo.delete(id, user_id).await? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// Give each block in `ids` its position in the list as `order`.
    ///
    /// Runs as a single transaction: either every block moves or none does.
    ///
    /// # Errors
    ///
    /// Returns [`DayPlanError::NotFound`] if any id does not exist or belongs
    /// to another user, or a storage error from the repository.
    #[tracing::instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn reorder_time_blocks(
        &self,
        ids: Vec<TimeBlockId>,
        user_id: UserId,
    ) -> Result<(), DayPlanError> {
        if ids.is_empty() {
            return Ok(());
        }
        self.repo.reorder(user_id, ids).await
    }
}

fn not_found(id: TimeBlockId) -> DayPlanError {
    NotFoundError {
        entity: "TimeBlock",
        id: id.to_string(),
    }
    .into()
}
