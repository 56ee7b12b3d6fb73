//! Goal repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};

/// Goal record from database
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct GoalRecord {
    pub id: i64,
    pub user_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    /// Stored lowercase, see `GoalStatus`
    pub status: String,
    pub category: Option<String>,
    pub target_value: Option<f64>,
    pub unit: Option<String>,
    pub current_value: Option<f64>,
}

/// Data access for goals
///
/// Status and title comparisons in the `exists_*` lookups ignore case.
#[async_trait]
pub trait GoalRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<GoalRecord>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<GoalRecord>>;
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<GoalRecord>>;
    async fn find_by_user_id_and_status(
        &self,
        user_id: i64,
        status: &str,
    ) -> Result<Vec<GoalRecord>>;
    async fn find_by_user_id_and_category(
        &self,
        user_id: i64,
        category: &str,
    ) -> Result<Vec<GoalRecord>>;
    async fn exists_by_id(&self, id: i64) -> Result<bool>;
    async fn exists_by_user_status_title(
        &self,
        user_id: i64,
        status: &str,
        title: &str,
    ) -> Result<bool>;
    /// Same as `exists_by_user_status_title` but ignores goal `exclude_id`
    async fn exists_by_user_status_title_excluding(
        &self,
        user_id: i64,
        status: &str,
        title: &str,
        exclude_id: i64,
    ) -> Result<bool>;
    async fn insert(&self, goal: &GoalRecord) -> Result<GoalRecord>;
    async fn update(&self, goal: &GoalRecord) -> Result<Option<GoalRecord>>;
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// PostgreSQL-backed goal repository
#[derive(Clone)]
pub struct PgGoalRepository {
    pool: PgPool,
}

impl PgGoalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GoalRepository for PgGoalRepository {
    async fn find_all(&self) -> Result<Vec<GoalRecord>> {
        let records = sqlx::query_as::<_, GoalRecord>(
            r#"
            SELECT id, user_id, title, description, start_date, target_date,
                   status, category, target_value, unit, current_value
            FROM goals
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<GoalRecord>> {
        let record = sqlx::query_as::<_, GoalRecord>(
            r#"
            SELECT id, user_id, title, description, start_date, target_date,
                   status, category, target_value, unit, current_value
            FROM goals
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<GoalRecord>> {
        let records = sqlx::query_as::<_, GoalRecord>(
            r#"
            SELECT id, user_id, title, description, start_date, target_date,
                   status, category, target_value, unit, current_value
            FROM goals
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn find_by_user_id_and_status(
        &self,
        user_id: i64,
        status: &str,
    ) -> Result<Vec<GoalRecord>> {
        let records = sqlx::query_as::<_, GoalRecord>(
            r#"
            SELECT id, user_id, title, description, start_date, target_date,
                   status, category, target_value, unit, current_value
            FROM goals
            WHERE user_id = $1 AND LOWER(status) = LOWER($2)
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn find_by_user_id_and_category(
        &self,
        user_id: i64,
        category: &str,
    ) -> Result<Vec<GoalRecord>> {
        let records = sqlx::query_as::<_, GoalRecord>(
            r#"
            SELECT id, user_id, title, description, start_date, target_date,
                   status, category, target_value, unit, current_value
            FROM goals
            WHERE user_id = $1 AND category = $2
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM goals WHERE id = $1)"#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn exists_by_user_status_title(
        &self,
        user_id: i64,
        status: &str,
        title: &str,
    ) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM goals
                WHERE user_id = $1
                  AND LOWER(status) = LOWER($2)
                  AND LOWER(title) = LOWER($3)
            )
            "#,
        )
        .bind(user_id)
        .bind(status)
        .bind(title)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn exists_by_user_status_title_excluding(
        &self,
        user_id: i64,
        status: &str,
        title: &str,
        exclude_id: i64,
    ) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM goals
                WHERE user_id = $1
                  AND LOWER(status) = LOWER($2)
                  AND LOWER(title) = LOWER($3)
                  AND id <> $4
            )
            "#,
        )
        .bind(user_id)
        .bind(status)
        .bind(title)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert(&self, goal: &GoalRecord) -> Result<GoalRecord> {
        insert_goal(&self.pool, goal).await
    }

    async fn update(&self, goal: &GoalRecord) -> Result<Option<GoalRecord>> {
        let record = sqlx::query_as::<_, GoalRecord>(
            r#"
            UPDATE goals SET
                title = $2,
                description = $3,
                start_date = $4,
                target_date = $5,
                status = $6,
                category = $7,
                target_value = $8,
                unit = $9,
                current_value = $10
            WHERE id = $1
            RETURNING id, user_id, title, description, start_date, target_date,
                      status, category, target_value, unit, current_value
            "#,
        )
        .bind(goal.id)
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(goal.start_date)
        .bind(goal.target_date)
        .bind(&goal.status)
        .bind(&goal.category)
        .bind(goal.target_value)
        .bind(&goal.unit)
        .bind(goal.current_value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM goals WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Insert on any executor, so callers can run it inside a transaction
pub(crate) async fn insert_goal<'e, E>(executor: E, goal: &GoalRecord) -> Result<GoalRecord>
where
    E: PgExecutor<'e>,
{
    let record = sqlx::query_as::<_, GoalRecord>(
        r#"
        INSERT INTO goals (
            user_id, title, description, start_date, target_date,
            status, category, target_value, unit, current_value
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, user_id, title, description, start_date, target_date,
                  status, category, target_value, unit, current_value
        "#,
    )
    .bind(goal.user_id)
    .bind(&goal.title)
    .bind(&goal.description)
    .bind(goal.start_date)
    .bind(goal.target_date)
    .bind(&goal.status)
    .bind(&goal.category)
    .bind(goal.target_value)
    .bind(&goal.unit)
    .bind(goal.current_value)
    .fetch_one(executor)
    .await?;

    Ok(record)
}
