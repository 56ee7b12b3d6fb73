//! User repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};

use super::goal::{insert_goal, GoalRecord};

/// User record from database
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub fitness_level: Option<String>,
}

/// Data access for users
///
/// `insert` ignores the record's `id` and returns the stored row with its
/// assigned key. Deleting a user removes their workouts and goals.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<UserRecord>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;
    async fn exists_by_id(&self, id: i64) -> Result<bool>;
    async fn insert(&self, user: &UserRecord) -> Result<UserRecord>;
    /// Insert a user and their initial goals as one unit; the goals'
    /// `user_id` is set to the new user's id
    async fn insert_with_goals(
        &self,
        user: &UserRecord,
        goals: &[GoalRecord],
    ) -> Result<(UserRecord, Vec<GoalRecord>)>;
    async fn update(&self, user: &UserRecord) -> Result<Option<UserRecord>>;
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_all(&self) -> Result<Vec<UserRecord>> {
        let users = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name,
                   date_of_birth, gender, height, weight, fitness_level
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name,
                   date_of_birth, gender, height, weight, fitness_level
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name,
                   date_of_birth, gender, height, weight, fitness_level
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name,
                   date_of_birth, gender, height, weight, fitness_level
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)"#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert(&self, user: &UserRecord) -> Result<UserRecord> {
        insert_user(&self.pool, user).await
    }

    async fn insert_with_goals(
        &self,
        user: &UserRecord,
        goals: &[GoalRecord],
    ) -> Result<(UserRecord, Vec<GoalRecord>)> {
        let mut tx = self.pool.begin().await?;

        let record = insert_user(&mut *tx, user).await?;

        let mut saved = Vec::with_capacity(goals.len());
        for goal in goals {
            let owned = GoalRecord {
                user_id: Some(record.id),
                ..goal.clone()
            };
            saved.push(insert_goal(&mut *tx, &owned).await?);
        }

        tx.commit().await?;

        Ok((record, saved))
    }

    async fn update(&self, user: &UserRecord) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users SET
                username = $2,
                email = $3,
                password_hash = $4,
                first_name = $5,
                last_name = $6,
                date_of_birth = $7,
                gender = $8,
                height = $9,
                weight = $10,
                fitness_level = $11
            WHERE id = $1
            RETURNING id, username, email, password_hash, first_name, last_name,
                      date_of_birth, gender, height, weight, fitness_level
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.date_of_birth)
        .bind(&user.gender)
        .bind(user.height)
        .bind(user.weight)
        .bind(&user.fitness_level)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        // Workouts, their exercises and goals go with the user (ON DELETE CASCADE)
        let result = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub(crate) async fn insert_user<'e, E>(executor: E, user: &UserRecord) -> Result<UserRecord>
where
    E: PgExecutor<'e>,
{
    let record = sqlx::query_as::<_, UserRecord>(
        r#"
        INSERT INTO users (
            username, email, password_hash, first_name, last_name,
            date_of_birth, gender, height, weight, fitness_level
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, username, email, password_hash, first_name, last_name,
                  date_of_birth, gender, height, weight, fitness_level
        "#,
    )
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(user.date_of_birth)
    .bind(&user.gender)
    .bind(user.height)
    .bind(user.weight)
    .bind(&user.fitness_level)
    .fetch_one(executor)
    .await?;

    Ok(record)
}
