//! Exercise repository for database operations
//!
//! Exercises always belong to a workout; the owning id is set once at
//! creation and never rewritten by `update`.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};

/// Exercise record from database
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ExerciseRecord {
    pub id: i64,
    pub workout_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    /// Kilograms
    pub weight: Option<f64>,
    /// Seconds
    pub duration: Option<i32>,
    /// Seconds
    pub rest_time: Option<i32>,
}

/// Data access for exercises
#[async_trait]
pub trait ExerciseRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<ExerciseRecord>>;
    async fn find_by_workout_id(&self, workout_id: i64) -> Result<Vec<ExerciseRecord>>;
    async fn exists_by_id(&self, id: i64) -> Result<bool>;
    async fn insert(&self, exercise: &ExerciseRecord) -> Result<ExerciseRecord>;
    async fn update(&self, exercise: &ExerciseRecord) -> Result<Option<ExerciseRecord>>;
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// PostgreSQL-backed exercise repository
#[derive(Clone)]
pub struct PgExerciseRepository {
    pool: PgPool,
}

impl PgExerciseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExerciseRepository for PgExerciseRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<ExerciseRecord>> {
        let record = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, workout_id, name, description, category,
                   sets, reps, weight, duration, rest_time
            FROM exercises
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_workout_id(&self, workout_id: i64) -> Result<Vec<ExerciseRecord>> {
        let records = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, workout_id, name, description, category,
                   sets, reps, weight, duration, rest_time
            FROM exercises
            WHERE workout_id = $1
            ORDER BY id
            "#,
        )
        .bind(workout_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM exercises WHERE id = $1)"#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert(&self, exercise: &ExerciseRecord) -> Result<ExerciseRecord> {
        insert_exercise(&self.pool, exercise).await
    }

    async fn update(&self, exercise: &ExerciseRecord) -> Result<Option<ExerciseRecord>> {
        let record = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            UPDATE exercises SET
                name = $2,
                description = $3,
                category = $4,
                sets = $5,
                reps = $6,
                weight = $7,
                duration = $8,
                rest_time = $9
            WHERE id = $1
            RETURNING id, workout_id, name, description, category,
                      sets, reps, weight, duration, rest_time
            "#,
        )
        .bind(exercise.id)
        .bind(&exercise.name)
        .bind(&exercise.description)
        .bind(&exercise.category)
        .bind(exercise.sets)
        .bind(exercise.reps)
        .bind(exercise.weight)
        .bind(exercise.duration)
        .bind(exercise.rest_time)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM exercises WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Insert on a pool or an open transaction
pub(crate) async fn insert_exercise<'e, E>(executor: E, exercise: &ExerciseRecord) -> Result<ExerciseRecord>
where
    E: PgExecutor<'e>,
{
    let record = sqlx::query_as::<_, ExerciseRecord>(
        r#"
        INSERT INTO exercises (
            workout_id, name, description, category,
            sets, reps, weight, duration, rest_time
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, workout_id, name, description, category,
                  sets, reps, weight, duration, rest_time
        "#,
    )
    .bind(exercise.workout_id)
    .bind(&exercise.name)
    .bind(&exercise.description)
    .bind(&exercise.category)
    .bind(exercise.sets)
    .bind(exercise.reps)
    .bind(exercise.weight)
    .bind(exercise.duration)
    .bind(exercise.rest_time)
    .fetch_one(executor)
    .await?;

    Ok(record)
}
