//! Storage port — repository trait for persisting time blocks.
//!
//! Every lookup and write is scoped by the owning [`UserId`]: a block that
//! belongs to someone else behaves exactly like a block that does not exist.

use std::future::Future;
use std::sync::Arc;

use dayplan_domain::error::DayPlanError;
use dayplan_domain::id::{TimeBlockId, UserId};
use dayplan_domain::time_block::TimeBlock;

/// Repository for persisting and querying [`TimeBlock`]s.
pub trait TimeBlockRepository {
    /// All blocks owned by `user_id`, ascending by `order`.
    fn find_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<TimeBlock>, DayPlanError>> + Send;

    /// The block `id` if it exists and is owned by `user_id`.
    fn get_by_id(
        &self,
        id: TimeBlockId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<TimeBlock>, DayPlanError>> + Send;

    /// Insert a new block.
    ///
    /// Implementations must check the owner's daily budget and insert in one
    /// atomic step, failing with
    /// [`ValidationError::DailyBudgetExceeded`](dayplan_domain::error::ValidationError::DailyBudgetExceeded)
    /// when the block does not fit.
    fn create(
        &self,
        block: TimeBlock,
    ) -> impl Future<Output = Result<TimeBlock, DayPlanError>> + Send;

    /// Overwrite the block matching `(block.id, block.user_id)`.
    ///
    /// Resolves to `None` when nothing matched. Like [`create`](Self::create),
    /// the budget check against the owner's other blocks and the write are
    /// one atomic step, failing with `DailyBudgetExceeded`.
    fn update(
        &self,
        block: TimeBlock,
    ) -> impl Future<Output = Result<Option<TimeBlock>, DayPlanError>> + Send;

    /// Remove the block matching `(id, user_id)`, resolving to whether a row
    /// was removed.
    fn delete(
        &self,
        id: TimeBlockId,
        user_id: UserId,
    ) -> impl Future<Output = Result<bool, DayPlanError>> + Send;

    /// Set `order = index` for every id in `ids`, all or nothing.
    ///
    /// Fails with [`DayPlanError::NotFound`] on the first id that does not
    /// match `(id, user_id)`, leaving every block untouched.
    fn reorder(
        &self,
        user_id: UserId,
        ids: Vec<TimeBlockId>,
    ) -> impl Future<Output = Result<(), DayPlanError>> + Send;
}

impl<T: TimeBlockRepository + Send + Sync> TimeBlockRepository for Arc<T> {
    fn find_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<TimeBlock>, DayPlanError>> + Send {
        (**self).find_by_user(user_id)
    }

    fn get_by_id(
        &self,
        id: TimeBlockId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<TimeBlock>, DayPlanError>> + Send {
        (**self).get_by_id(id, user_id)
    }

    fn create(
        &self,
        block: TimeBlock,
    ) -> impl Future<Output = Result<TimeBlock, DayPlanError>> + Send {
        (**self).create(block)
    }

    fn update(
        &self,
        block: TimeBlock,
    ) -> impl Future<Output = Result<Option<TimeBlock>, DayPlanError>> + Send {
        (**self).update(block)
    }

    fn delete(
        &self,
        id: TimeBlockId,
        user_id: UserId,
    ) -> impl Future<Output = Result<bool, DayPlanError>> + Send {
        (**self).delete(id, user_id)
    }

    fn reorder(
        &self,
        user_id: UserId,
        ids: Vec<TimeBlockId>,
    ) -> impl Future<Output = Result<(), DayPlanError>> + Send {
        (**self).reorder(user_id, ids)
    }
}
