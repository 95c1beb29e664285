//! `SQLite` implementation of [`TimeBlockRepository`].

use std::str::FromStr;

use chrono::SecondsFormat;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use dayplan_app::ports::TimeBlockRepository;
use dayplan_domain::error::{DayPlanError, NotFoundError, ValidationError};
use dayplan_domain::id::{TimeBlockId, UserId};
use dayplan_domain::time_block::{DAILY_BUDGET_MINUTES, TimeBlock, Timestamp};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`TimeBlock`].
struct Wrapper(TimeBlock);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<TimeBlock> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let name: String = row.try_get("name")?;
        let color: Option<String> = row.try_get("color")?;
        let duration: i64 = row.try_get("duration")?;
        let order: i64 = row.try_get("sort_order")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        let id = TimeBlockId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let user_id =
            UserId::from_str(&user_id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let duration =
            u32::try_from(duration).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(TimeBlock {
            id,
            user_id,
            name,
            color,
            duration,
            order,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }
}

fn parse_timestamp(value: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.to_utc())
        .map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn format_timestamp(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

const INSERT_WITHIN_BUDGET: &str = r"
    INSERT INTO time_blocks (id, user_id, name, color, duration, sort_order, created_at, updated_at)
    SELECT ?, ?, ?, ?, ?, ?, ?, ?
    WHERE (SELECT COALESCE(SUM(duration), 0) FROM time_blocks WHERE user_id = ?) + ? <= ?
";

const SUM_BY_USER: &str = r"
    SELECT COALESCE(SUM(duration), 0) FROM time_blocks
    WHERE user_id = ?1 AND (?2 IS NULL OR id != ?2)
";
const SELECT_BY_USER: &str =
    "SELECT * FROM time_blocks WHERE user_id = ? ORDER BY sort_order ASC, created_at ASC, id ASC";
const SELECT_BY_ID: &str = "SELECT * FROM time_blocks WHERE id = ? AND user_id = ?";

const UPDATE_WITHIN_BUDGET: &str = r"
    UPDATE time_blocks
    SET name = ?, color = ?, duration = ?, sort_order = ?, updated_at = ?
    WHERE id = ? AND user_id = ?
      AND (SELECT COALESCE(SUM(duration), 0) FROM time_blocks WHERE user_id = ? AND id != ?) + ? <= ?
";

const UPDATE_ORDER: &str =
    "UPDATE time_blocks SET sort_order = ?, updated_at = ? WHERE id = ? AND user_id = ?";

const DELETE_BY_ID: &str = "DELETE FROM time_blocks WHERE id = ? AND user_id = ?";

/// `SQLite`-backed time block repository.
pub struct SqliteTimeBlockRepository {
    pool: SqlitePool,
}

impl SqliteTimeBlockRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Minutes booked by `user_id`, leaving out `except` when given.
    async fn booked_minutes(
        &self,
        user_id: UserId,
        except: Option<TimeBlockId>,
    ) -> Result<u32, DayPlanError> {
        let (sum,): (i64,) = sqlx::query_as(SUM_BY_USER)
            .bind(user_id.to_string())
            .bind(except.map(|id| id.to_string()))
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(u32::try_from(sum).unwrap_or(u32::MAX))
    }
}

impl TimeBlockRepository for SqliteTimeBlockRepository {
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<TimeBlock>, DayPlanError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_USER)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn get_by_id(
        &self,
        id: TimeBlockId,
        user_id: UserId,
    ) -> Result<Option<TimeBlock>, DayPlanError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn create(&self, block: TimeBlock) -> Result<TimeBlock, DayPlanError> {
        let user_id = block.user_id.to_string();

        let result = sqlx::query(INSERT_WITHIN_BUDGET)
            .bind(block.id.to_string())
            .bind(&user_id)
            .bind(&block.name)
            .bind(block.color.as_deref())
            .bind(i64::from(block.duration))
            .bind(block.order)
            .bind(format_timestamp(block.created_at))
            .bind(format_timestamp(block.updated_at))
            .bind(&user_id)
            .bind(i64::from(block.duration))
            .bind(i64::from(DAILY_BUDGET_MINUTES))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            let booked = self.booked_minutes(block.user_id, None).await?;
            tracing::debug!(%user_id, booked, "insert refused by daily budget guard");
            return Err(ValidationError::DailyBudgetExceeded {
                booked,
                requested: block.duration,
            }
            .into());
        }

        Ok(block)
    }

    async fn update(&self, block: TimeBlock) -> Result<Option<TimeBlock>, DayPlanError> {
        let id = block.id.to_string();
        let user_id = block.user_id.to_string();

        let result = sqlx::query(UPDATE_WITHIN_BUDGET)
            .bind(&block.name)
            .bind(block.color.as_deref())
            .bind(i64::from(block.duration))
            .bind(block.order)
            .bind(format_timestamp(block.updated_at))
            .bind(&id)
            .bind(&user_id)
            .bind(&user_id)
            .bind(&id)
            .bind(i64::from(block.duration))
            .bind(i64::from(DAILY_BUDGET_MINUTES))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() > 0 {
            return Ok(Some(block));
        }

        // Nothing matched: either the block is gone or the guard refused it.
        if self.get_by_id(block.id, block.user_id).await?.is_none() {
            return Ok(None);
        }
        let booked = self.booked_minutes(block.user_id, Some(block.id)).await?;
        tracing::debug!(%user_id, booked, "update refused by daily budget guard");
        Err(ValidationError::DailyBudgetExceeded {
            booked,
            requested: block.duration,
        }
        .into())
    }

    async fn delete(&self, id: TimeBlockId, user_id: UserId) -> Result<bool, DayPlanError> {
        let result = sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn reorder(&self, user_id: UserId, ids: Vec<TimeBlockId>) -> Result<(), DayPlanError> {
        let user_id = user_id.to_string();
        let now = format_timestamp(chrono::Utc::now());

        // Dropping `tx` without committing rolls every update back.
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        for (order, id) in (0_i64..).zip(ids) {
            let result = sqlx::query(UPDATE_ORDER)
                .bind(order)
                .bind(&now)
                .bind(id.to_string())
                .bind(&user_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(NotFoundError {
                    entity: "TimeBlock",
                    id: id.to_string(),
                }
                .into());
            }
        }

        tx.commit().await.map_err(StorageError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use dayplan_domain::time_block::NewTimeBlock;

    async fn setup() -> SqliteTimeBlockRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteTimeBlockRepository::new(db.pool().clone())
    }

    fn block(user_id: UserId, minutes: u32) -> TimeBlock {
        let draft = NewTimeBlock::builder()
            .name("Writing")
            .color("#336699")
            .duration(minutes)
            .build()
            .unwrap();
        TimeBlock::new(draft, user_id, chrono::Utc::now())
    }

    #[tokio::test]
    async fn should_create_and_retrieve_block_for_owner() {
        let repo = setup().await;
        let user = UserId::new();
        let created = repo.create(block(user, 60)).await.unwrap();

        let fetched = repo.get_by_id(created.id, user).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.name, "Writing");
        assert_eq!(fetched.color.as_deref(), Some("#336699"));
        assert_eq!(fetched.duration, 60);
        assert_eq!(fetched.order, created.order);
    }

    #[tokio::test]
    async fn should_hide_block_from_other_users() {
        let repo = setup().await;
        let created = repo.create(block(UserId::new(), 60)).await.unwrap();

        let fetched = repo.get_by_id(created.id, UserId::new()).await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn should_list_user_blocks_by_ascending_order() {
        let repo = setup().await;
        let user = UserId::new();
        for order in [5, 1, 3] {
            let mut b = block(user, 10);
            b.order = order;
            repo.create(b).await.unwrap();
        }
        repo.create(block(UserId::new(), 10)).await.unwrap();

        let orders: Vec<i64> = repo
            .find_by_user(user)
            .await
            .unwrap()
            .iter()
            .map(|b| b.order)
            .collect();
        assert_eq!(orders, vec![1, 3, 5]);
    }

    #[tokio::test]
    async fn should_refuse_insert_past_daily_budget() {
        let repo = setup().await;
        let user = UserId::new();
        repo.create(block(user, 1000)).await.unwrap();

        let result = repo.create(block(user, 441)).await;
        assert!(matches!(
            result,
            Err(DayPlanError::Validation(
                ValidationError::DailyBudgetExceeded {
                    booked: 1000,
                    requested: 441
                }
            ))
        ));
        assert_eq!(repo.find_by_user(user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_accept_insert_that_fills_the_day_exactly() {
        let repo = setup().await;
        let user = UserId::new();
        repo.create(block(user, 1000)).await.unwrap();
        repo.create(block(user, 440)).await.unwrap();

        assert_eq!(repo.booked_minutes(user, None).await.unwrap(), 1440);
    }

    #[tokio::test]
    async fn should_update_block_when_owned() {
        let repo = setup().await;
        let user = UserId::new();
        let mut b = repo.create(block(user, 30)).await.unwrap();

        b.name = "Editing".to_string();
        b.color = None;
        b.duration = 45;
        let saved = repo.update(b.clone()).await.unwrap();
        assert_eq!(saved, Some(b.clone()));

        let fetched = repo.get_by_id(b.id, user).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Editing");
        assert!(fetched.color.is_none());
        assert_eq!(fetched.duration, 45);
    }

    #[tokio::test]
    async fn should_refuse_update_past_daily_budget() {
        let repo = setup().await;
        let user = UserId::new();
        repo.create(block(user, 1000)).await.unwrap();
        let mut grown = repo.create(block(user, 200)).await.unwrap();

        grown.duration = 500;
        let result = repo.update(grown.clone()).await;
        assert!(matches!(
            result,
            Err(DayPlanError::Validation(
                ValidationError::DailyBudgetExceeded {
                    booked: 1000,
                    requested: 500
                }
            ))
        ));

        let fetched = repo.get_by_id(grown.id, user).await.unwrap().unwrap();
        assert_eq!(fetched.duration, 200);
    }

    #[tokio::test]
    async fn should_not_count_updated_block_against_its_own_budget() {
        let repo = setup().await;
        let user = UserId::new();
        repo.create(block(user, 400)).await.unwrap();
        let mut grown = repo.create(block(user, 1000)).await.unwrap();

        grown.duration = 1040;
        assert!(repo.update(grown).await.unwrap().is_some());
        assert_eq!(repo.booked_minutes(user, None).await.unwrap(), 1440);
    }

    #[tokio::test]
    async fn should_not_update_block_of_another_user() {
        let repo = setup().await;
        let owner = UserId::new();
        let original = repo.create(block(owner, 30)).await.unwrap();

        let mut forged = original.clone();
        forged.user_id = UserId::new();
        forged.name = "Stolen".to_string();
        assert!(repo.update(forged).await.unwrap().is_none());

        let fetched = repo.get_by_id(original.id, owner).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Writing");
    }

    #[tokio::test]
    async fn should_delete_only_when_owned() {
        let repo = setup().await;
        let owner = UserId::new();
        let b = repo.create(block(owner, 30)).await.unwrap();

        assert!(!repo.delete(b.id, UserId::new()).await.unwrap());
        assert!(repo.get_by_id(b.id, owner).await.unwrap().is_some());

        assert!(repo.delete(b.id, owner).await.unwrap());
        assert!(repo.get_by_id(b.id, owner).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_assign_positions_on_reorder() {
        let repo = setup().await;
        let user = UserId::new();
        let a = repo.create(block(user, 10)).await.unwrap();
        let b = repo.create(block(user, 10)).await.unwrap();
        let c = repo.create(block(user, 10)).await.unwrap();

        repo.reorder(user, vec![b.id, c.id, a.id]).await.unwrap();

        let listed: Vec<(TimeBlockId, i64)> = repo
            .find_by_user(user)
            .await
            .unwrap()
            .iter()
            .map(|x| (x.id, x.order))
            .collect();
        assert_eq!(listed, vec![(b.id, 0), (c.id, 1), (a.id, 2)]);
    }

    #[tokio::test]
    async fn should_roll_back_reorder_when_an_id_is_missing() {
        let repo = setup().await;
        let user = UserId::new();
        let a = repo.create(block(user, 10)).await.unwrap();
        let b = repo.create(block(user, 10)).await.unwrap();

        let result = repo
            .reorder(user, vec![b.id, a.id, TimeBlockId::new()])
            .await;
        assert!(matches!(result, Err(DayPlanError::NotFound(_))));

        for x in repo.find_by_user(user).await.unwrap() {
            assert_eq!(x.order, 1);
        }
    }

    #[tokio::test]
    async fn should_roll_back_reorder_when_an_id_belongs_to_someone_else() {
        let repo = setup().await;
        let user = UserId::new();
        let mine = repo.create(block(user, 10)).await.unwrap();
        let theirs = repo.create(block(UserId::new(), 10)).await.unwrap();

        let result = repo.reorder(user, vec![mine.id, theirs.id]).await;
        assert!(matches!(result, Err(DayPlanError::NotFound(_))));

        let fetched = repo.get_by_id(mine.id, user).await.unwrap().unwrap();
        assert_eq!(fetched.order, 1);
    }
}
