//! Workout repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{PgExecutor, PgPool};

use super::exercise::{insert_exercise, ExerciseRecord};

/// Workout record from database
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct WorkoutRecord {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    /// Minutes
    pub duration: Option<i32>,
    pub workout_type: Option<String>,
    pub calories_burned: Option<i32>,
}

/// Data access for workouts
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<WorkoutRecord>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<WorkoutRecord>>;
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<WorkoutRecord>>;
    async fn find_by_user_id_and_type(
        &self,
        user_id: i64,
        workout_type: &str,
    ) -> Result<Vec<WorkoutRecord>>;
    /// Workouts whose start time lies in `[start, end]`
    async fn find_by_user_id_and_start_time_between(
        &self,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<WorkoutRecord>>;
    async fn exists_by_id(&self, id: i64) -> Result<bool>;
    async fn insert(&self, workout: &WorkoutRecord) -> Result<WorkoutRecord>;
    /// Insert a workout together with its exercises; either all rows are
    /// stored or none
    async fn insert_with_exercises(
        &self,
        workout: &WorkoutRecord,
        exercises: &[ExerciseRecord],
    ) -> Result<(WorkoutRecord, Vec<ExerciseRecord>)>;
    async fn update(&self, workout: &WorkoutRecord) -> Result<Option<WorkoutRecord>>;
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// PostgreSQL-backed workout repository
#[derive(Clone)]
pub struct PgWorkoutRepository {
    pool: PgPool,
}

impl PgWorkoutRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkoutRepository for PgWorkoutRepository {
    async fn find_all(&self) -> Result<Vec<WorkoutRecord>> {
        let records = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT id, user_id, name, description, start_time, end_time,
                   duration, workout_type, calories_burned
            FROM workouts
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<WorkoutRecord>> {
        let record = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT id, user_id, name, description, start_time, end_time,
                   duration, workout_type, calories_burned
            FROM workouts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<WorkoutRecord>> {
        let records = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT id, user_id, name, description, start_time, end_time,
                   duration, workout_type, calories_burned
            FROM workouts
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn find_by_user_id_and_type(
        &self,
        user_id: i64,
        workout_type: &str,
    ) -> Result<Vec<WorkoutRecord>> {
        let records = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT id, user_id, name, description, start_time, end_time,
                   duration, workout_type, calories_burned
            FROM workouts
            WHERE user_id = $1 AND workout_type = $2
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(workout_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn find_by_user_id_and_start_time_between(
        &self,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<WorkoutRecord>> {
        let records = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT id, user_id, name, description, start_time, end_time,
                   duration, workout_type, calories_burned
            FROM workouts
            WHERE user_id = $1 AND start_time BETWEEN $2 AND $3
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM workouts WHERE id = $1)"#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert(&self, workout: &WorkoutRecord) -> Result<WorkoutRecord> {
        insert_workout(&self.pool, workout).await
    }

    async fn insert_with_exercises(
        &self,
        workout: &WorkoutRecord,
        exercises: &[ExerciseRecord],
    ) -> Result<(WorkoutRecord, Vec<ExerciseRecord>)> {
        let mut tx = self.pool.begin().await?;

        let record = insert_workout(&mut *tx, workout).await?;

        let mut saved = Vec::with_capacity(exercises.len());
        for exercise in exercises {
            let owned = ExerciseRecord {
                workout_id: record.id,
                ..exercise.clone()
            };
            saved.push(insert_exercise(&mut *tx, &owned).await?);
        }

        tx.commit().await?;

        Ok((record, saved))
    }

    async fn update(&self, workout: &WorkoutRecord) -> Result<Option<WorkoutRecord>> {
        // user_id is fixed at creation
        let record = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            UPDATE workouts SET
                name = $2,
                description = $3,
                start_time = $4,
                end_time = $5,
                duration = $6,
                workout_type = $7,
                calories_burned = $8
            WHERE id = $1
            RETURNING id, user_id, name, description, start_time, end_time,
                      duration, workout_type, calories_burned
            "#,
        )
        .bind(workout.id)
        .bind(&workout.name)
        .bind(&workout.description)
        .bind(workout.start_time)
        .bind(workout.end_time)
        .bind(workout.duration)
        .bind(&workout.workout_type)
        .bind(workout.calories_burned)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM workouts WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub(crate) async fn insert_workout<'e, E>(executor: E, workout: &WorkoutRecord) -> Result<WorkoutRecord>
where
    E: PgExecutor<'e>,
{
    let record = sqlx::query_as::<_, WorkoutRecord>(
        r#"
        INSERT INTO workouts (
            user_id, name, description, start_time, end_time,
            duration, workout_type, calories_burned
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, user_id, name, description, start_time, end_time,
                  duration, workout_type, calories_burned
        "#,
    )
    .bind(workout.user_id)
    .bind(&workout.name)
    .bind(&workout.description)
    .bind(workout.start_time)
    .bind(workout.end_time)
    .bind(workout.duration)
    .bind(&workout.workout_type)
    .bind(workout.calories_burned)
    .fetch_one(executor)
    .await?;

    Ok(record)
}
