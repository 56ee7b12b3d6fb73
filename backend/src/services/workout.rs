//! Workout service
//!
//! Workouts are returned with their exercises. Creation can carry an
//! `exercises` array, which is validated up front and stored after the
//! workout itself.

use crate::error::ApiError;
use crate::mappers::WorkoutMapper;
use crate::repositories::{Repositories, WorkoutRecord};
use crate::services::ExerciseService;
use chrono::{NaiveDateTime, Utc};
use fitness_tracker_shared::{types::WorkoutDto, validation};
use tracing::info;

/// Workout service for business logic
pub struct WorkoutService;

impl WorkoutService {
    pub async fn get_all_workouts(repos: &Repositories) -> Result<Vec<WorkoutDto>, ApiError> {
        let records = repos.workouts.find_all().await.map_err(ApiError::Internal)?;
        Self::with_exercises(repos, records).await
    }

    pub async fn get_workout(repos: &Repositories, id: i64) -> Result<WorkoutDto, ApiError> {
        let record = Self::find_workout(repos, id).await?;
        Self::view(repos, &record).await
    }

    pub async fn get_workouts_by_user(
        repos: &Repositories,
        user_id: i64,
    ) -> Result<Vec<WorkoutDto>, ApiError> {
        let records = repos
            .workouts
            .find_by_user_id(user_id)
            .await
            .map_err(ApiError::Internal)?;
        Self::with_exercises(repos, records).await
    }

    pub async fn get_workouts_by_user_and_type(
        repos: &Repositories,
        user_id: i64,
        workout_type: &str,
    ) -> Result<Vec<WorkoutDto>, ApiError> {
        let records = repos
            .workouts
            .find_by_user_id_and_type(user_id, workout_type)
            .await
            .map_err(ApiError::Internal)?;
        Self::with_exercises(repos, records).await
    }

    /// Workouts starting within `[start, end]`, both ends inclusive
    pub async fn get_workouts_by_user_in_range(
        repos: &Repositories,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<WorkoutDto>, ApiError> {
        validation::validate_time_range(start, end).map_err(ApiError::Validation)?;

        let records = repos
            .workouts
            .find_by_user_id_and_start_time_between(user_id, start, end)
            .await
            .map_err(ApiError::Internal)?;
        Self::with_exercises(repos, records).await
    }

    /// Create a workout and any nested exercises
    pub async fn create_workout(
        repos: &Repositories,
        dto: WorkoutDto,
    ) -> Result<WorkoutDto, ApiError> {
        let name = dto
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ApiError::Validation("Workout name is required".to_string()))?
            .to_string();
        let start_time = dto.start_time.unwrap_or_else(|| Utc::now().naive_utc());

        let record = WorkoutRecord {
            name,
            start_time,
            ..WorkoutMapper::to_entity(&dto)
        };
        validate_workout(&record)?;

        let exercises = dto
            .exercises
            .unwrap_or_default()
            .iter()
            .map(|exercise| ExerciseService::new_record(0, exercise))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(user_id) = record.user_id {
            let exists = repos
                .users
                .exists_by_id(user_id)
                .await
                .map_err(ApiError::Internal)?;
            if !exists {
                return Err(ApiError::NotFound(format!("User not found with id: {}", user_id)));
            }
        }

        let (saved, exercises) = repos
            .workouts
            .insert_with_exercises(&record, &exercises)
            .await
            .map_err(ApiError::Internal)?;

        info!(
            workout_id = saved.id,
            user_id = ?saved.user_id,
            exercises = exercises.len(),
            "Workout created"
        );

        Ok(WorkoutMapper::to_dto(&saved, &exercises))
    }

    /// Update a workout; its exercises are left untouched
    pub async fn update_workout(
        repos: &Repositories,
        id: i64,
        dto: WorkoutDto,
    ) -> Result<WorkoutDto, ApiError> {
        let existing = Self::find_workout(repos, id).await?;

        let name = dto
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| existing.name.clone());

        let record = WorkoutRecord {
            id,
            user_id: existing.user_id,
            name,
            description: dto.description,
            start_time: dto.start_time.unwrap_or(existing.start_time),
            end_time: dto.end_time,
            duration: dto.duration,
            workout_type: dto.workout_type,
            calories_burned: dto.calories_burned,
        };
        validate_workout(&record)?;

        let saved = repos
            .workouts
            .update(&record)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("Workout not found with id: {}", id)))?;

        Self::view(repos, &saved).await
    }

    /// Delete a workout together with its exercises
    pub async fn delete_workout(repos: &Repositories, id: i64) -> Result<(), ApiError> {
        let deleted = repos.workouts.delete(id).await.map_err(ApiError::Internal)?;
        if !deleted {
            return Err(ApiError::NotFound(format!("Workout not found with id: {}", id)));
        }

        info!(workout_id = id, "Workout deleted");
        Ok(())
    }

    pub(crate) async fn find_workout(
        repos: &Repositories,
        id: i64,
    ) -> Result<WorkoutRecord, ApiError> {
        repos
            .workouts
            .find_by_id(id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("Workout not found with id: {}", id)))
    }

    async fn view(repos: &Repositories, record: &WorkoutRecord) -> Result<WorkoutDto, ApiError> {
        let exercises = repos
            .exercises
            .find_by_workout_id(record.id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(WorkoutMapper::to_dto(record, &exercises))
    }

    async fn with_exercises(
        repos: &Repositories,
        records: Vec<WorkoutRecord>,
    ) -> Result<Vec<WorkoutDto>, ApiError> {
        let mut views = Vec::with_capacity(records.len());
        for record in &records {
            views.push(Self::view(repos, record).await?);
        }
        Ok(views)
    }
}

fn validate_workout(record: &WorkoutRecord) -> Result<(), ApiError> {
    if let Some(duration) = record.duration {
        validation::validate_duration_minutes(duration).map_err(ApiError::Validation)?;
    }
    if let Some(calories) = record.calories_burned {
        validation::validate_non_negative("caloriesBurned", calories)
            .map_err(ApiError::Validation)?;
    }
    if let Some(end) = record.end_time {
        validation::validate_time_range(record.start_time, end).map_err(ApiError::Validation)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::UserRecord;
    use chrono::NaiveDate;
    use fitness_tracker_shared::types::ExerciseDto;

    async fn seed_user(repos: &Repositories) -> i64 {
        repos
            .users
            .insert(&UserRecord {
                id: 0,
                username: "runner".to_string(),
                email: "runner@example.com".to_string(),
                password_hash: "$argon2id$stub".to_string(),
                first_name: None,
                last_name: None,
                date_of_birth: None,
                gender: None,
                height: None,
                weight: None,
                fitness_level: None,
            })
            .await
            .unwrap()
            .id
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn workout(user_id: i64, name: &str) -> WorkoutDto {
        WorkoutDto {
            name: Some(name.to_string()),
            user_id: Some(user_id),
            start_time: Some(at(1, 7)),
            workout_type: Some("run".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_defaults_start_time() {
        let repos = Repositories::in_memory();
        let user_id = seed_user(&repos).await;

        let before = Utc::now().naive_utc();
        let created = WorkoutService::create_workout(
            &repos,
            WorkoutDto {
                start_time: None,
                ..workout(user_id, "Morning run")
            },
        )
        .await
        .unwrap();

        assert!(created.start_time.unwrap() >= before - chrono::Duration::seconds(1));
        assert_eq!(created.exercises, Some(vec![]));
    }

    #[tokio::test]
    async fn test_create_with_nested_exercises() {
        let repos = Repositories::in_memory();
        let user_id = seed_user(&repos).await;

        let dto = WorkoutDto {
            exercises: Some(vec![
                ExerciseDto {
                    name: Some("Bench press".to_string()),
                    sets: Some(3),
                    reps: Some(8),
                    ..Default::default()
                },
                ExerciseDto {
                    name: Some("Row".to_string()),
                    ..Default::default()
                },
            ]),
            ..workout(user_id, "Push day")
        };
        let created = WorkoutService::create_workout(&repos, dto).await.unwrap();

        let exercises = created.exercises.unwrap();
        assert_eq!(exercises.len(), 2);
        assert!(exercises.iter().all(|e| e.workout_id == created.id));
    }

    #[tokio::test]
    async fn test_invalid_nested_exercise_stores_nothing() {
        let repos = Repositories::in_memory();
        let user_id = seed_user(&repos).await;

        let dto = WorkoutDto {
            exercises: Some(vec![ExerciseDto::default()]),
            ..workout(user_id, "Push day")
        };
        let err = WorkoutService::create_workout(&repos, dto).await.unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert!(repos.workouts.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let repos = Repositories::in_memory();
        let user_id = seed_user(&repos).await;

        let nameless = WorkoutService::create_workout(&repos, workout(user_id, " "))
            .await
            .unwrap_err();
        assert!(matches!(nameless, ApiError::Validation(_)));

        let backwards = WorkoutDto {
            end_time: Some(at(1, 6)),
            ..workout(user_id, "Time travel")
        };
        let err = WorkoutService::create_workout(&repos, backwards).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let orphan = WorkoutService::create_workout(&repos, workout(999, "Ghost run"))
            .await
            .unwrap_err();
        assert!(matches!(orphan, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_name_and_owner() {
        let repos = Repositories::in_memory();
        let user_id = seed_user(&repos).await;
        let created = WorkoutService::create_workout(&repos, workout(user_id, "Tempo run"))
            .await
            .unwrap();

        let updated = WorkoutService::update_workout(
            &repos,
            created.id.unwrap(),
            WorkoutDto {
                calories_burned: Some(350),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name.as_deref(), Some("Tempo run"));
        assert_eq!(updated.user_id, Some(user_id));
        assert_eq!(updated.start_time, Some(at(1, 7)));
        assert_eq!(updated.calories_burned, Some(350));
        assert_eq!(updated.workout_type, None);
    }

    #[tokio::test]
    async fn test_range_and_type_queries() {
        let repos = Repositories::in_memory();
        let user_id = seed_user(&repos).await;
        for (day, kind) in [(1, "run"), (5, "swim"), (9, "run")] {
            let dto = WorkoutDto {
                start_time: Some(at(day, 7)),
                workout_type: Some(kind.to_string()),
                ..workout(user_id, kind)
            };
            WorkoutService::create_workout(&repos, dto).await.unwrap();
        }

        let runs = WorkoutService::get_workouts_by_user_and_type(&repos, user_id, "run")
            .await
            .unwrap();
        assert_eq!(runs.len(), 2);

        let early = WorkoutService::get_workouts_by_user_in_range(&repos, user_id, at(1, 0), at(5, 7))
            .await
            .unwrap();
        assert_eq!(early.len(), 2);

        let inverted =
            WorkoutService::get_workouts_by_user_in_range(&repos, user_id, at(9, 0), at(1, 0))
                .await
                .unwrap_err();
        assert!(matches!(inverted, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_workout() {
        let repos = Repositories::in_memory();
        let err = WorkoutService::delete_workout(&repos, 12).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
